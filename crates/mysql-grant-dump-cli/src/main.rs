//! mysql-grant-dump CLI - dump MySQL user accounts to a file and replay it.

use clap::Parser;
use mysql_grant_dump::config::default_credentials_path;
use mysql_grant_dump::{Config, Credentials, DumpError, DumpFormat, MysqlSession};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "mysql-grant-dump")]
#[command(about = "Dump MySQL user accounts and grants to a file, then replay it")]
#[command(version)]
struct Cli {
    /// Source MySQL host
    #[arg(short = 's', long = "source")]
    source: String,

    /// Dump file to write and replay
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Only dump the specified user
    #[arg(short = 'o', long = "only-user")]
    only_user: Option<String>,

    /// Output format: raw, import, pt-like
    #[arg(long, default_value = "raw", value_parser = parse_format)]
    format: DumpFormat,

    /// Source MySQL port
    #[arg(short = 'P', long, default_value = "3306")]
    port: u16,

    /// Seconds to wait between writing the dump and replaying it
    #[arg(long, default_value = "5")]
    replay_delay: u64,

    /// Credentials file with user= and password= lines [default: ~/.my.cnf]
    #[arg(long)]
    defaults_file: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

fn parse_format(s: &str) -> Result<DumpFormat, String> {
    s.parse::<DumpFormat>()
        .map_err(|_| format!("invalid format '{}' (expected raw, import or pt-like)", s))
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), DumpError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let credentials_path = match cli.defaults_file {
        Some(ref path) => path.clone(),
        None => default_credentials_path()?,
    };
    if !credentials_path.exists() {
        return Err(DumpError::Credentials(format!(
            "{} not found. Please create it with the database credentials (user= and password= lines).",
            credentials_path.display()
        )));
    }
    let credentials = Credentials::load(&credentials_path)?;

    let mut config = Config::new(cli.source, cli.file, credentials);
    config.port = cli.port;
    config.only_user = cli.only_user;
    config.format = cli.format;
    config.replay_delay = Duration::from_secs(cli.replay_delay);
    config.validate()?;

    info!(
        "Dumping user accounts from {} to {}",
        config.source_host,
        config.dump_file.display()
    );

    let mut session = MysqlSession::connect(&config).await?;
    let result = mysql_grant_dump::run(&mut session, &config, &mut std::io::stdout()).await?;
    session.disconnect().await?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        println!("Dump and replay completed!");
        println!("  Format: {}", result.dump.format);
        println!("  Accounts: {}", result.dump.accounts.len());
        println!("  File: {}", result.dump.path.display());
        println!("  Statements replayed: {}", result.replay.statements);
        println!("  Duration: {:.2}s", result.duration_seconds);
    }

    Ok(())
}

/// Logs go to stderr; stdout carries the replay output.
fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

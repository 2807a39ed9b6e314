//! Parsing and rewriting of `SHOW CREATE USER` output.
//!
//! The rewrites assume MySQL 8 syntax: the statement starts with
//! `CREATE USER ` and the authentication part is introduced by
//! ` IDENTIFIED `. An account name containing that token is split in the
//! wrong place; other server versions have not been checked.

/// Prefix of every `SHOW CREATE USER` result.
const CREATE_USER_PREFIX: &str = "CREATE USER ";

/// Token separating the account clause from the authentication clause.
const IDENTIFIED_DELIMITER: &str = " IDENTIFIED ";

/// Structure of a `CREATE USER` statement as needed for pt-like output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUser<'a> {
    /// `CREATE USER <account> IDENTIFIED <identification>`
    Identified {
        account: &'a str,
        identification: &'a str,
    },
    /// `CREATE USER <account>` with no authentication clause.
    Bare { account: &'a str },
    /// Anything else; emitted verbatim.
    Unrecognized(&'a str),
}

impl<'a> CreateUser<'a> {
    /// Split a statement on the first ` IDENTIFIED ` token.
    pub fn parse(stmt: &'a str) -> Self {
        let Some(rest) = stmt.strip_prefix(CREATE_USER_PREFIX) else {
            return CreateUser::Unrecognized(stmt);
        };

        match rest.split_once(IDENTIFIED_DELIMITER) {
            Some((account, identification)) => {
                let account = account.trim();
                let identification = identification.trim();
                if account.is_empty() {
                    CreateUser::Unrecognized(stmt)
                } else if identification.is_empty() {
                    CreateUser::Bare { account }
                } else {
                    CreateUser::Identified {
                        account,
                        identification,
                    }
                }
            }
            None => match rest.trim() {
                "" => CreateUser::Unrecognized(stmt),
                account => CreateUser::Bare { account },
            },
        }
    }

    /// Lines for the pt-like format, each terminated with `;`.
    pub fn pt_like_lines(&self) -> Vec<String> {
        match self {
            CreateUser::Identified {
                account,
                identification,
            } => vec![
                format!("CREATE USER IF NOT EXISTS {};", account),
                format!("ALTER USER {} IDENTIFIED {};", account, identification),
            ],
            CreateUser::Bare { account } => {
                vec![format!("CREATE USER IF NOT EXISTS {};", account)]
            }
            CreateUser::Unrecognized(stmt) => vec![format!("{};", stmt)],
        }
    }
}

/// Make a `CREATE USER` statement idempotent for the import format.
///
/// Only the leading keyword is rewritten.
pub fn create_if_not_exists(stmt: &str) -> String {
    stmt.replacen("CREATE USER", "CREATE USER IF NOT EXISTS", 1)
}

/// Strip `IF NOT EXISTS` back out of a grant line.
///
/// `CREATE USER` is also a privilege name, and a grant listing it must not
/// carry the qualifier.
pub fn strip_if_not_exists(grant: &str) -> String {
    grant.replace("CREATE USER IF NOT EXISTS", "CREATE USER")
}

//! Authentication credentials.
//!
//! The database name, login and password are only ever sent by the
//! `authenticate` call and, afterwards, alongside the session id on every
//! model call. A session without a complete set is anonymous and may only
//! use the `common` and `db` services.
//!
//! Empty strings count as missing.
//!
//! # Example
//!
//! ```
//! use bizrpc_client::Credentials;
//!
//! let creds = Credentials::new(Some("prod".into()), Some("admin".into()), Some("secret".into()));
//! assert!(creds.is_complete());
//! assert_eq!(creds.to_string(), "Credentials(db=prod, user=admin, password=*****)");
//!
//! let anonymous = Credentials::anonymous();
//! assert!(!anonymous.is_complete());
//! ```

use std::fmt;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(database: Option<String>, username: Option<String>, password: Option<String>) -> Self {
        Self {
            database: non_empty(database),
            username: non_empty(username),
            password: non_empty(password),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns `(database, username, password)` when all three are present.
    pub fn complete(&self) -> Option<(&str, &str, &str)> {
        match (self.database(), self.username(), self.password()) {
            (Some(db), Some(user), Some(password)) => Some((db, user, password)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.database.is_none() && self.username.is_none() && self.password.is_none() {
            return write!(f, "Anonymous");
        }
        write!(
            f,
            "Credentials(db={}, user={}, password={})",
            self.database().unwrap_or("-"),
            self.username().unwrap_or("-"),
            if self.password.is_some() { "*****" } else { "-" },
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

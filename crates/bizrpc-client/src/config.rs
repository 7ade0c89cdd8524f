//! Client configuration.
//!
//! A [`ClientConfig`] names the server root, the API sub-path and the
//! optional credentials of one logical connection. It deserializes with
//! serde so applications can load it from whatever format they already use.
//!
//! # Example
//!
//! ```
//! use bizrpc_client::ClientConfig;
//!
//! let config = ClientConfig::authenticated("https://erp.example.com/", "prod", "admin", "secret")
//!     .with_timeout_ms(10_000);
//! assert_eq!(config.api_url(), "https://erp.example.com/xmlrpc/2");
//! ```

use std::fmt;

use bizrpc_common::transport::HttpTransportConfig;
use serde::Deserialize;

use crate::credentials::Credentials;

/// API sub-path used when none is configured.
pub const DEFAULT_API_PATH: &str = "xmlrpc/2";

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

/// Strips surrounding whitespace, NUL and `/` from an address segment.
pub fn trim_separators(segment: &str) -> &str {
    segment.trim_matches(|c: char| c.is_whitespace() || c == '/' || c == '\0')
}

#[derive(Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Server root, e.g. `https://erp.example.com:8069/sub/dir`
    pub base_url: String,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub transport: HttpTransportConfig,
}

impl ClientConfig {
    /// Anonymous configuration for `base_url` with the default API path.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: default_api_path(),
            database: None,
            username: None,
            password: None,
            transport: HttpTransportConfig::default(),
        }
    }

    /// A session limited to endpoints that need no session id.
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
    }

    pub fn authenticated(
        base_url: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(base_url).with_credentials(database, username, password)
    }

    pub fn with_credentials(
        mut self,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.database = Some(database.into());
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Selects another API variant; `None` restores the default.
    pub fn with_api_path(mut self, api_path: Option<&str>) -> Self {
        self.api_path = api_path.map(str::to_string).unwrap_or_else(default_api_path);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.transport.timeout_ms = timeout_ms;
        self
    }

    /// Normalized `base_url/api_path`.
    pub fn api_url(&self) -> String {
        format!("{}/{}", trim_separators(&self.base_url), self.normalized_api_path())
    }

    pub fn normalized_api_path(&self) -> &str {
        match trim_separators(&self.api_path) {
            "" => DEFAULT_API_PATH,
            path => path,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.database.clone(),
            self.username.clone(),
            self.password.clone(),
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_path", &self.api_path)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "*****"))
            .field("transport", &self.transport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_separators() {
        assert_eq!(trim_separators(" https://host/ "), "https://host");
        assert_eq!(trim_separators("/xmlrpc/2/"), "xmlrpc/2");
        assert_eq!(trim_separators("\t/object\n"), "object");
        assert_eq!(trim_separators("common\0"), "common");
        assert_eq!(trim_separators("///"), "");
    }

    #[test]
    fn test_api_url_defaults() {
        let config = ClientConfig::new("https://host/");
        assert_eq!(config.api_path, DEFAULT_API_PATH);
        assert_eq!(config.api_url(), "https://host/xmlrpc/2");
    }

    #[test]
    fn test_custom_api_path() {
        let config = ClientConfig::new("https://host:8069/erp").with_api_path(Some("/jsonrpc/"));
        assert_eq!(config.api_url(), "https://host:8069/erp/jsonrpc");

        let restored = config.with_api_path(None);
        assert_eq!(restored.api_url(), "https://host:8069/erp/xmlrpc/2");
    }

    #[test]
    fn test_blank_api_path_falls_back_to_default() {
        let mut config = ClientConfig::new("https://host");
        config.api_path = " / ".into();
        assert_eq!(config.api_url(), "https://host/xmlrpc/2");
    }

    #[test]
    fn test_authenticated_config() {
        let config = ClientConfig::authenticated("https://host", "d", "u", "p");
        assert!(config.credentials().is_complete());

        let anonymous = ClientConfig::anonymous("https://host");
        assert!(!anonymous.credentials().is_complete());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url": "https://host", "database": "d", "username": "u", "password": "p"}"#,
        )
        .unwrap();
        assert_eq!(config.api_path, DEFAULT_API_PATH);
        assert_eq!(config.transport.timeout_ms, 30000);
        assert!(config.credentials().is_complete());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::authenticated("https://host", "d", "u", "hunter2");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("*****"));
    }
}

//! Runtime configuration, read from `LEDGER_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.

use chrono::Duration;
use serde::Deserialize;

/// PBKDF2 rounds used when hashing admin passwords
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Created at startup when no admin account exists yet
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite:site_ledger.db".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();
        envy::prefixed("LEDGER_").from_env::<Config>()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours.max(1))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Bootstrap credentials, only when both halves are configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) if !username.trim().is_empty() => {
                Some((username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_server_port(),
            database_url: default_database_url(),
            cors_origin: default_cors_origin(),
            session_ttl_hours: default_session_ttl_hours(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            admin_username: None,
            admin_password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config: Config = envy::prefixed("LEDGER_").from_iter(vars(&[])).unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_url, "sqlite:site_ledger.db");
        assert_eq!(config.session_ttl(), Duration::hours(24));
        assert!(config.bootstrap_admin().is_none());
    }

    #[test]
    fn test_prefixed_overrides() {
        let config: Config = envy::prefixed("LEDGER_")
            .from_iter(vars(&[
                ("LEDGER_SERVER_PORT", "8088"),
                ("LEDGER_DATABASE_URL", "sqlite:/tmp/site.db"),
                ("LEDGER_ADMIN_USERNAME", "office"),
                ("LEDGER_ADMIN_PASSWORD", "s3cret"),
                ("UNRELATED", "ignored"),
            ]))
            .unwrap();

        assert_eq!(config.server_port, 8088);
        assert_eq!(config.bind_address(), "127.0.0.1:8088");
        assert_eq!(config.database_url, "sqlite:/tmp/site.db");
        assert_eq!(config.bootstrap_admin(), Some(("office", "s3cret")));
    }

    #[test]
    fn test_bootstrap_requires_both_credentials() {
        let config = Config {
            admin_username: Some("office".to_string()),
            ..Config::default()
        };
        assert!(config.bootstrap_admin().is_none());
    }
}

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use qna_core::SeedUser;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub seed_users: Vec<SeedUser>,
    pub hash_passwords: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset and empty values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match get("QNA_HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("QNA_HOST", format!("not an IP address: {raw}")))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = match get("QNA_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("QNA_PORT", format!("not a port: {raw}")))?,
            None => 8000,
        };

        let db_path = get("QNA_DB_PATH").unwrap_or_else(|| "qna.db".into()).into();
        let log_level = get("QNA_LOG_LEVEL").unwrap_or_else(|| "info".into());

        let log_format = match get("QNA_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "QNA_LOG_FORMAT",
                    format!("expected text or json, got {other}"),
                ));
            }
        };

        let seed_users = match get("QNA_SEED_USERS") {
            Some(raw) => parse_seed_users(&raw)?,
            None => Vec::new(),
        };

        let hash_passwords = match get("QNA_HASH_PASSWORDS").as_deref().map(str::trim) {
            None => false,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "QNA_HASH_PASSWORDS",
                    format!("expected a boolean, got {other}"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            db_path,
            log_level,
            log_format,
            seed_users,
            hash_passwords,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse `user:pass,user2:pass2`. The password is everything after the first colon.
fn parse_seed_users(raw: &str) -> Result<Vec<SeedUser>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (username, password) = entry.split_once(':').ok_or_else(|| {
                ConfigError::invalid("QNA_SEED_USERS", format!("missing ':' in entry {entry:?}"))
            })?;
            if username.is_empty() || password.is_empty() {
                return Err(ConfigError::invalid(
                    "QNA_SEED_USERS",
                    format!("empty username or password in entry {entry:?}"),
                ));
            }
            Ok(SeedUser {
                username: username.to_string(),
                password: password.to_string(),
            })
        })
        .collect()
}

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use skillmatch_api::AuthConfig;
use tracing::warn;

/// Placeholder JWT secrets that MUST NOT be used in production.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = var("SKILLMATCH_ENV").is_some_and(|env| env == "production");

        let jwt_secret = match var("SKILLMATCH_JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) if production && PLACEHOLDER_SECRETS.contains(&secret.as_str()) => {
                bail!("SKILLMATCH_JWT_SECRET is still a placeholder")
            }
            Some(secret) => secret,
            None if production => bail!("SKILLMATCH_JWT_SECRET must be set in production"),
            None => {
                warn!("SKILLMATCH_JWT_SECRET unset, using the development placeholder");
                DEV_SECRET.to_string()
            }
        };

        let db_path = var("SKILLMATCH_DB_PATH").unwrap_or_else(|| "skillmatch.db".into());
        let host = var("SKILLMATCH_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("SKILLMATCH_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("SKILLMATCH_PORT is not a valid port")?;
        let session_days: i64 = var("SKILLMATCH_SESSION_DAYS")
            .map(|v| v.parse())
            .transpose()
            .context("SKILLMATCH_SESSION_DAYS is not a number")?
            .unwrap_or(30);
        if session_days < 1 {
            bail!("SKILLMATCH_SESSION_DAYS must be at least 1");
        }
        let secure_cookies = var("SKILLMATCH_SECURE_COOKIES")
            .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes"));

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            db_path: db_path.into(),
            addr,
            auth: AuthConfig {
                jwt_secret,
                session_days,
                secure_cookies,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_for_development() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("skillmatch.db"));
        assert_eq!(config.addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.auth.jwt_secret, DEV_SECRET);
        assert_eq!(config.auth.session_days, 30);
        assert!(!config.auth.secure_cookies);
    }

    #[test]
    fn production_rejects_placeholder_secrets() {
        assert!(load(&[("SKILLMATCH_ENV", "production")]).is_err());
        assert!(
            load(&[
                ("SKILLMATCH_ENV", "production"),
                ("SKILLMATCH_JWT_SECRET", "change-me-to-a-random-string"),
            ])
            .is_err()
        );

        let config = load(&[
            ("SKILLMATCH_ENV", "production"),
            ("SKILLMATCH_JWT_SECRET", "4f9c1d0e7a"),
            ("SKILLMATCH_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        assert_eq!(config.auth.jwt_secret, "4f9c1d0e7a");
        assert!(config.auth.secure_cookies);
    }

    #[test]
    fn overrides_and_bad_values() {
        let config = load(&[
            ("SKILLMATCH_HOST", "127.0.0.1"),
            ("SKILLMATCH_PORT", "8080"),
            ("SKILLMATCH_DB_PATH", "/tmp/jobs.db"),
            ("SKILLMATCH_SESSION_DAYS", "7"),
        ])
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/jobs.db"));
        assert_eq!(config.auth.session_days, 7);

        assert!(load(&[("SKILLMATCH_PORT", "http")]).is_err());
        assert!(load(&[("SKILLMATCH_SESSION_DAYS", "0")]).is_err());
    }
}

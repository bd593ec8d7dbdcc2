use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server configuration resolved from the environment once at startup.
///
/// `DATABASE_URL` and `JWT_SECRET` are required and missing either aborts
/// startup. The optional groups (service key, generative API, SMTP) gate
/// individual endpoints: a handler that needs an absent secret answers with
/// `RequestError::Misconfigured` instead of degrading.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Elevated credential for service-to-service admin calls.
    pub service_key: Option<String>,
    pub generative: Option<GenerativeConfig>,
    pub smtp: Option<SmtpConfig>,
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    /// Full URL of the model endpoint, e.g. a `generateContent` URL.
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// From address for outbound notifications.
    pub sender: String,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        // Checked here so a missing secret fails at boot, not on first login.
        std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let generative = resolve_generative(
            std::env::var("GENERATIVE_API_URL").ok(),
            std::env::var("GENERATIVE_API_KEY").ok(),
        );
        let smtp = resolve_smtp(
            std::env::var("SMTP_HOST").ok(),
            std::env::var("SMTP_USERNAME").ok(),
            std::env::var("SMTP_PASSWORD").ok(),
            std::env::var("SMTP_SENDER").ok(),
        );

        Ok(Config {
            database_url,
            service_key: std::env::var("SERVICE_KEY").ok(),
            generative,
            smtp,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        })
    }
}

/// Both variables or neither. A half-set group almost always means a typo in
/// the deployment environment, so it gets a startup warning instead of
/// silently disabling the feature.
fn resolve_generative(
    api_url: Option<String>,
    api_key: Option<String>,
) -> Option<GenerativeConfig> {
    match (api_url, api_key) {
        (Some(api_url), Some(api_key)) => Some(GenerativeConfig { api_url, api_key }),
        (None, None) => None,
        _ => {
            tracing::warn!(
                "generative API disabled: GENERATIVE_API_URL and GENERATIVE_API_KEY must both be set"
            );
            None
        }
    }
}

fn resolve_smtp(
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    sender: Option<String>,
) -> Option<SmtpConfig> {
    match (host, username, password, sender) {
        (Some(host), Some(username), Some(password), Some(sender)) => Some(SmtpConfig {
            host,
            username,
            password,
            sender,
        }),
        (None, None, None, None) => None,
        _ => {
            tracing::warn!(
                "SMTP notifications disabled: SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and SMTP_SENDER must all be set"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn generative_group_needs_both_variables() {
        assert!(resolve_generative(None, None).is_none());
        assert!(resolve_generative(set("https://api.example.com"), None).is_none());
        assert!(resolve_generative(None, set("key")).is_none());

        let config = resolve_generative(set("https://api.example.com"), set("key")).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
    }

    #[test]
    fn smtp_group_needs_all_four_variables() {
        assert!(resolve_smtp(None, None, None, None).is_none());
        assert!(resolve_smtp(set("smtp.example.com"), set("bot"), None, None).is_none());

        let config = resolve_smtp(
            set("smtp.example.com"),
            set("bot"),
            set("hunter2"),
            set("noreply@example.com"),
        )
        .unwrap();
        assert_eq!(config.sender, "noreply@example.com");
    }
}

use crate::domain::models::risk_zone::RiskZone;
use std::env;
use thiserror::Error;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const MIN_SESSION_SECRET_LEN: usize = 32;
const SESSION_TTL_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub public_base_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub oauth_auth_url: String,
    pub oauth_token_url: String,
    pub oauth_userinfo_url: String,
    pub provider_timeout_secs: u64,
    pub static_dir: String,
    pub risk_zones: Vec<RiskZone>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: String| lookup(key).unwrap_or(default);

        let port: u16 = parse_var(&lookup, "PORT", 3000)?;

        let session_secret = required(&lookup, "SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
            });
        }

        let session_ttl_hours: i64 = parse_var(&lookup, "SESSION_TTL_HOURS", 24)?;
        if !SESSION_TTL_RANGE.contains(&session_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                reason: format!(
                    "must be between {} and {}",
                    SESSION_TTL_RANGE.start(),
                    SESSION_TTL_RANGE.end()
                ),
            });
        }

        let risk_zones = match lookup("RISK_ZONES") {
            Some(raw) => parse_risk_zones(&raw)?,
            None => RiskZone::defaults(),
        };

        Ok(Self {
            database_url: or_default("DATABASE_URL", "sqlite://tourists.db".to_string()),
            port,
            public_base_url: or_default("PUBLIC_BASE_URL", format!("http://localhost:{}", port)),
            session_secret,
            session_ttl_hours,
            cookie_secure: parse_var(&lookup, "COOKIE_SECURE", true)?,
            oauth_client_id: required(&lookup, "GOOGLE_CLIENT_ID")?,
            oauth_client_secret: required(&lookup, "GOOGLE_CLIENT_SECRET")?,
            oauth_auth_url: or_default("OAUTH_AUTH_URL", DEFAULT_AUTH_URL.to_string()),
            oauth_token_url: or_default("OAUTH_TOKEN_URL", DEFAULT_TOKEN_URL.to_string()),
            oauth_userinfo_url: or_default("OAUTH_USERINFO_URL", DEFAULT_USERINFO_URL.to_string()),
            provider_timeout_secs: parse_var(&lookup, "PROVIDER_TIMEOUT_SECS", 10)?,
            static_dir: or_default("STATIC_DIR", "static".to_string()),
            risk_zones,
        })
    }

    pub fn callback_url(&self) -> String {
        format!("{}/login/callback", self.public_base_url.trim_end_matches('/'))
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

pub fn parse_risk_zones(raw: &str) -> Result<Vec<RiskZone>, ConfigError> {
    let zones: Vec<RiskZone> = serde_json::from_str(raw).map_err(|e| ConfigError::Invalid {
        key: "RISK_ZONES",
        reason: e.to_string(),
    })?;

    for zone in &zones {
        if !zone.radius.is_finite() || zone.radius <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "RISK_ZONES",
                reason: format!("zone ({}, {}) needs a positive radius", zone.latitude, zone.longitude),
            });
        }
        if zone.penalty < 0 {
            return Err(ConfigError::Invalid {
                key: "RISK_ZONES",
                reason: format!("zone ({}, {}) has a negative penalty", zone.latitude, zone.longitude),
            });
        }
    }

    Ok(zones)
}

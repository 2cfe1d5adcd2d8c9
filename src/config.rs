//! Process configuration loaded from the environment.
//!
//! Values come from real environment variables, optionally seeded from a
//! `.env` file by `dotenvy`. The platform token is never compiled in.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/v2";
pub const DEFAULT_LINKEDIN_ACTOR: &str = "BHzefUZlZRKWxkTck";
pub const DEFAULT_INDEED_ACTOR: &str = "hMvNSpz3JnHgl5jkh";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How a job is driven on the actor platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    /// One blocking run-and-fetch call.
    Sync,
    /// Start a run, poll its status, then fetch the dataset.
    AsyncPoll,
}

impl FromStr for JobMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "async" | "async-poll" | "poll" => Ok(Self::AsyncPoll),
            other => Err(format!("expected 'sync' or 'async', got '{other}'")),
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => f.write_str("sync"),
            Self::AsyncPoll => f.write_str("async-poll"),
        }
    }
}

/// One actor on the platform and the mode used to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorConfig {
    pub actor_id: String,
    pub mode: JobMode,
}

/// Settings for the job platform HTTP client.
#[derive(Clone)]
pub struct ApifyConfig {
    pub base_url: String,
    pub token: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    /// Per-request timeout for async-poll calls. Sync runs are never timed out locally.
    pub request_timeout: Option<Duration>,
}

impl ApifyConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout: None,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }
}

// Hand-written so the token stays out of debug logs.
impl fmt::Debug for ApifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub apify: ApifyConfig,
    pub linkedin: ActorConfig,
    pub indeed: ActorConfig,
}

impl AppConfig {
    /// Load from the process environment (after reading `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token = get("APIFY_TOKEN").ok_or(ConfigError::Missing("APIFY_TOKEN"))?;
        let base_url =
            get("APIFY_BASE_URL").unwrap_or_else(|| DEFAULT_APIFY_BASE_URL.to_string());

        let poll_secs: u64 = parse_positive(
            "APIFY_POLL_INTERVAL_SECS",
            get("APIFY_POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        let max_attempts: u32 = parse_positive(
            "APIFY_MAX_POLL_ATTEMPTS",
            get("APIFY_MAX_POLL_ATTEMPTS"),
            DEFAULT_MAX_POLL_ATTEMPTS,
        )?;
        let request_timeout = match get("APIFY_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_positive(
                "APIFY_HTTP_TIMEOUT_SECS",
                Some(raw),
                0,
            )?)),
            None => None,
        };

        let mut apify = ApifyConfig::new(base_url, token)
            .with_polling(Duration::from_secs(poll_secs), max_attempts);
        apify.request_timeout = request_timeout;

        let linkedin = ActorConfig {
            actor_id: get("LINKEDIN_ACTOR_ID").unwrap_or_else(|| DEFAULT_LINKEDIN_ACTOR.into()),
            mode: parse_mode("LINKEDIN_JOB_MODE", get("LINKEDIN_JOB_MODE"), JobMode::AsyncPoll)?,
        };
        let indeed = ActorConfig {
            actor_id: get("INDEED_ACTOR_ID").unwrap_or_else(|| DEFAULT_INDEED_ACTOR.into()),
            mode: parse_mode("INDEED_JOB_MODE", get("INDEED_JOB_MODE"), JobMode::Sync)?,
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|err| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: err.to_string(),
            })?,
            None => 8080,
        };

        let allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                allowed_origins,
            },
            apify,
            linkedin,
            indeed,
        })
    }
}

fn parse_positive<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: fmt::Display,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = raw.parse::<T>().map_err(|err| ConfigError::Invalid {
        var,
        value: raw.clone(),
        reason: err.to_string(),
    })?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn parse_mode(
    var: &'static str,
    raw: Option<String>,
    default: JobMode,
) -> Result<JobMode, ConfigError> {
    match raw {
        Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
            var,
            value: raw,
            reason,
        }),
        None => Ok(default),
    }
}

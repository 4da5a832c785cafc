//! Configuration types.
//!
//! Everything is read from the environment (after `.env` has been loaded by
//! the binary). The `*_from_lookup` constructors take the lookup function as
//! a parameter so tests never have to touch the process environment.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::coach::CoachConfig;
use crate::error::ConfigError;
use crate::llm::LlmConfig;

/// Default OpenAI-compatible API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default HTTP port for the coach server.
pub const DEFAULT_PORT: u16 = 5001;
/// Default server the terminal wizard talks to.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

/// Environment variable names.
pub mod env_keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const MODEL: &str = "RESOLUTION_COACH_MODEL";
    pub const OPENAI_BASE_URL: &str = "RESOLUTION_COACH_OPENAI_BASE_URL";
    pub const PORT: &str = "RESOLUTION_COACH_PORT";
    pub const MAX_QUESTIONS: &str = "RESOLUTION_COACH_MAX_QUESTIONS";
    pub const LOG_DIR: &str = "RESOLUTION_COACH_LOG_DIR";
    pub const SERVER_URL: &str = "RESOLUTION_COACH_SERVER_URL";
    pub const REQUEST_TIMEOUT_SECS: &str = "RESOLUTION_COACH_REQUEST_TIMEOUT_SECS";
}

/// Coach server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds on (all interfaces).
    pub port: u16,
    /// Upstream completion service.
    pub llm: LlmConfig,
    /// Question/resolution generation settings.
    pub coach: CoachConfig,
    /// Directory for rolling log files, if file logging is wanted.
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read the server configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the server configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(env_keys::OPENAI_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(env_keys::OPENAI_API_KEY.to_string()))?;

        let llm = LlmConfig {
            api_key: SecretString::from(api_key),
            model: lookup(env_keys::MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup(env_keys::OPENAI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        };

        let port = parse_or(&lookup, env_keys::PORT, DEFAULT_PORT)?;

        let mut coach = CoachConfig::default();
        coach.max_questions = parse_or(&lookup, env_keys::MAX_QUESTIONS, coach.max_questions)?;
        if coach.max_questions == 0 {
            return Err(ConfigError::InvalidValue {
                key: env_keys::MAX_QUESTIONS.to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port,
            llm,
            coach,
            log_dir: lookup(env_keys::LOG_DIR).map(PathBuf::from),
        })
    }
}

/// Terminal wizard (client) configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the coach server.
    pub server_url: String,
    /// Per-request timeout. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
    /// Use the legacy `/submit_answer` path instead of `/get_next_question`.
    pub legacy_submit_path: bool,
    /// Directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Read the client configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the client configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, env_keys::REQUEST_TIMEOUT_SECS, 0)?;
        Ok(Self {
            server_url: lookup(env_keys::SERVER_URL)
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            legacy_submit_path: false,
            log_dir: lookup(env_keys::LOG_DIR).map(PathBuf::from),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: None,
            legacy_submit_path: false,
            log_dir: None,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}

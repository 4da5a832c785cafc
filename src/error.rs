//! Error types for the resolution coach.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Question flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Coach error: {0}")]
    Coach(#[from] CoachError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Intake collector errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Expected field {expected}, got {got}")]
    UnexpectedField { expected: String, got: String },

    #[error("Field {field} must not be empty")]
    EmptyValue { field: String },

    #[error("{value:?} is not a valid option for {field}")]
    NotAnOption { field: String, value: String },

    #[error("Intake is already complete")]
    AlreadyComplete,
}

/// Question-flow engine errors.
///
/// Everything except `InvalidAnswer` and `InvalidTransition` moves the
/// engine into its `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    ServerReported(String),

    #[error("Empty resolution received")]
    EmptyResult,

    #[error("Invalid answer: {reason}")]
    InvalidAnswer { reason: String },

    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },
}

impl FlowError {
    /// Generic, non-technical message shown to the user alongside the
    /// restart affordance.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::ServerReported(_) => {
                "Oops! Something went wrong. Please start over and try again."
            }
            Self::EmptyResult => "Unable to generate your resolution. Please start over.",
            Self::InvalidAnswer { .. } => "Please check your answer and try again.",
            Self::InvalidTransition { .. } => "This questionnaire has ended. Please start over.",
        }
    }

    /// Whether this error ends the session.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::InvalidAnswer { .. } | Self::InvalidTransition { .. }
        )
    }
}

/// Coach service (server-side) errors.
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    #[error("Thread ID is required")]
    MissingThreadId,

    #[error("Thread {0} not found")]
    ThreadNotFound(String),

    #[error("Request timed out. Please try again.")]
    Timeout { after: Duration },

    #[error("No resolution received from assistant")]
    EmptyResolution,

    #[error("No question received from assistant")]
    EmptyQuestion,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, StepKind};

/// Failure reported by a step consumer while handling an event.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ConsumerError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConsumerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            message: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// A consumer failed; the rest of the sequence was abandoned.
    #[error("consumer '{consumer}' failed on {}: {source}", step.map(|s| s.as_str()).unwrap_or("start"))]
    ConsumerFault {
        consumer: String,
        step: Option<StepKind>,
        #[source]
        source: ConsumerError,
    },

    #[error("pacing must be positive, got {0} ms")]
    InvalidPacing(u64),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

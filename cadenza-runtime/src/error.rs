use std::any::Any;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors surfaced to callers of the scheduler API
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Every interval identifier has been handed out
    #[error("interval identifier space exhausted")]
    IdSpaceExhausted,

    #[error("scheduler must be started from within a tokio runtime")]
    NoRuntime,

    #[error("failed to load scheduler config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("event loop task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A typed failure reported by a task action.
///
/// Action failures are logged by the event loop and never reach the caller
/// that registered the task.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Message(String),

    #[error("{0}")]
    Source(#[source] Box<dyn StdError + Send + Sync>),
}

impl ActionError {
    pub fn msg(message: impl Into<String>) -> Self {
        ActionError::Message(message.into())
    }

    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ActionError::Source(Box::new(error))
    }
}

impl From<Box<dyn StdError + Send + Sync>> for ActionError {
    fn from(error: Box<dyn StdError + Send + Sync>) -> Self {
        ActionError::Source(error)
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        ActionError::Message(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        ActionError::Message(message.to_string())
    }
}

/// Render a panic payload caught from an action
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

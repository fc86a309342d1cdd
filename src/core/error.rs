// Centralized error handling for action construction

use thiserror::Error;

/// Errors produced while turning raw node attributes into actions.
///
/// Each variant carries the complete diagnostic: the attribute name, the
/// offending value, and the expected form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A required attribute was absent (empty string).
    #[error("{0}")]
    MissingAttribute(String),

    /// An attribute was present but malformed.
    #[error("{0}")]
    InvalidContent(String),

    /// An enum-valued attribute held a value outside its closed set.
    #[error("{0}")]
    UnknownAttribute(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingAttribute,
    InvalidContent,
    UnknownAttribute,
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::MissingAttribute(_) => ErrorKind::MissingAttribute,
            ActionError::InvalidContent(_) => ErrorKind::InvalidContent,
            ActionError::UnknownAttribute(_) => ErrorKind::UnknownAttribute,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ActionError::MissingAttribute(msg)
            | ActionError::InvalidContent(msg)
            | ActionError::UnknownAttribute(msg) => msg,
        }
    }

    pub(crate) fn missing(action: &str, attribute: &str) -> Self {
        ActionError::MissingAttribute(format!(
            "{} action missing required attribute '{}'",
            action, attribute
        ))
    }
}

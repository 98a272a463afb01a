use thiserror::Error;

/// The one error the user is meant to see.
///
/// `origins` holds the ids of the elements that caused it; the shell flags
/// them so the surface can highlight the offending inputs next to the alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExpensesError {
    pub message: String,
    pub origins: Vec<String>,
}

impl ExpensesError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origins: vec![],
        }
    }

    pub fn with_origin(mut self, element_id: impl Into<String>) -> Self {
        self.origins.push(element_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("tag not found: {0}")]
    NotFound(String),
    #[error("no tag is being edited")]
    NotEditing,
    #[error("unknown parent tag: {0}")]
    UnknownParent(String),
    #[error("'{parent}' cannot become the parent of '{tag}': it would create a cycle")]
    Cycle { tag: String, parent: String },
    #[error("unknown color: {0}")]
    UnknownColor(String),
    #[error("tag '{0}' already exists")]
    Duplicate(String),
}

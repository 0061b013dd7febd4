/// Error type for building and loading forms.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The form definition is not valid JSON or has the wrong shape.
    #[error("Invalid form definition: {0}")]
    Json(#[from] serde_json::Error),

    /// The form definition file could not be read.
    #[error("Failed to read form definition: {0}")]
    Io(#[from] std::io::Error),

    /// Two questions share the same id.
    #[error("Duplicate question id: {0}")]
    DuplicateId(String),

    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),
}

impl FormError {
    /// Check if this error comes from a malformed definition rather than I/O.
    pub fn is_definition_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PmpjError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Undefined final risk combination: residual severity {residual}, client severity {client}")]
    UndefinedCombination { residual: u8, client: u8 },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PmpjError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PmpjError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PmpjError {
    fn from(e: serde_json::Error) -> Self {
        PmpjError::SerializationError(e.to_string())
    }
}

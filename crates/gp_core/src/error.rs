use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidConfig { field, reason: reason.into() }
    }

    /// Parse failures can be retried with a corrected document; a
    /// semantically invalid table needs a calibration change.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::Yaml(_) | CoreError::Json(_) => true,
            CoreError::InvalidConfig { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

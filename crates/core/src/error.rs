/// Domain error kinds shared by the repository and HTTP layers.
///
/// Storage failures are not represented here; they travel as `sqlx::Error`
/// until the HTTP layer classifies them.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found ({details})")]
    NotFound {
        entity: &'static str,
        details: String,
    },

    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        message: String,
        details: Option<String>,
    },

    #[error("Invalid filter {field}={value}: {message}")]
    InvalidFilter {
        field: String,
        value: String,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, details: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            details: details.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn invalid_filter(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidFilter {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

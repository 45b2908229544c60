use thiserror::Error;

/// Errors surfaced to callers of the client module.
///
/// Transport failures and HTTP error statuses all collapse here; the rendered
/// message is what lands in the entity state's `error_message`.
#[derive(Error, Debug, Clone)]
pub enum UserInfoError {
    #[error("User info not found: {id}")]
    NotFound { id: i64 },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl UserInfoError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

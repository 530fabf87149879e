//! Contract error types for the company directory
//!
//! These errors are transport-agnostic; the REST layer maps them to status
//! codes and response envelopes.

/// Company directory domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Company page, tab document or SEO record not found
    NotFound {
        /// Resource type (company_page, tab, seo_record)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Conflict (duplicate slug, stale version)
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Validation error
    Validation {
        /// Validation error message
        message: String,
    },
    /// Tab name outside the allow-list
    UnknownTab {
        /// Name supplied by the caller
        name: String,
    },
    /// JSON Schema validation of tab content failed
    SchemaValidation {
        /// Validation errors
        errors: Vec<String>,
    },
    /// Internal error
    Internal,
}

impl DirectoryError {
    pub fn not_found(resource: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Conflict { reason } => {
                write!(f, "Conflict: {}", reason)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::UnknownTab { name } => {
                write!(f, "Unknown tab: {}", name)
            }
            Self::SchemaValidation { errors } => {
                write!(f, "Schema validation failed: {}", errors.join(", "))
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

//! Error handling for the funcgen scaffolding library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Variants map one-to-one onto the
//! failure modes of the create-function workflow; field-level validation
//! failures only surface here when there is no prompt left to re-ask.
//!
//! # Examples
//!
//! ```
//! use funcgen::core::error::{Error, Result};
//!
//! fn might_cancel(cancelled: bool) -> Result<()> {
//!     if cancelled {
//!         return Err(Error::UserCancelled);
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_cancel(true).unwrap_err().is_user_cancelled());
//! ```

use thiserror::Error;

/// Result type for funcgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for funcgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The user dismissed a prompt or chose to abort
    #[error("Operation cancelled by user")]
    UserCancelled,

    /// A supplied value failed its field validator
    #[error("Invalid {field}: {message}")]
    ValidationRejected { field: String, message: String },

    /// A required external tool is not installed or not on PATH
    #[error("Required tool '{tool}' was not found. {guidance}")]
    MissingDependency { tool: String, guidance: String },

    /// An external tool ran but exited with a failure status
    #[error("Command '{command}' failed with exit code {exit_code}")]
    ExternalToolFailure {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// The catalog has no template for the requested combination
    #[error("No templates found for language {language}, runtime {runtime} and filter {filter}")]
    NoEligibleTemplates {
        language: String,
        runtime: String,
        filter: String,
    },

    /// A preset template id matched nothing eligible
    #[error("Could not find template with id '{0}'")]
    TemplateNotFound(String),

    /// The template catalog is malformed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),
}

impl Error {
    /// Create a new validation error for a named field
    pub fn rejected<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::ValidationRejected {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is a user cancellation rather than a failure
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    /// Short stable label used when recording the workflow outcome
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserCancelled => "UserCancelled",
            Self::ValidationRejected { .. } => "ValidationRejected",
            Self::MissingDependency { .. } => "MissingDependency",
            Self::ExternalToolFailure { .. } => "ExternalToolFailure",
            Self::NoEligibleTemplates { .. } => "NoEligibleTemplates",
            Self::TemplateNotFound(_) => "TemplateNotFound",
            Self::Catalog(_) => "Catalog",
            Self::Config(_) => "Config",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Yaml(_) => "Yaml",
            Self::Toml(_) => "Toml",
            Self::Tera(_) => "Tera",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::rejected("function name", "The name cannot be empty");
        assert_eq!(err.to_string(), "Invalid function name: The name cannot be empty");

        let err = Error::ExternalToolFailure {
            command: "mvn azure-functions:add".to_string(),
            exit_code: 1,
            output: "BUILD FAILURE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command 'mvn azure-functions:add' failed with exit code 1"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::UserCancelled.kind(), "UserCancelled");
        assert_eq!(Error::catalog("bad").kind(), "Catalog");
        assert!(Error::UserCancelled.is_user_cancelled());
        assert!(!Error::config("x").is_user_cancelled());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

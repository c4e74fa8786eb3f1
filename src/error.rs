//! Error types and handling for pyreqs
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

#![allow(dead_code)]

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pyreqs operations
#[derive(Error, Diagnostic, Debug)]
pub enum PyreqsError {
    // Scan errors
    #[error("Scan root not found: {path}")]
    #[diagnostic(
        code(pyreqs::scan::root_not_found),
        help("Check that the path exists and is a directory")
    )]
    RootNotFound { path: String },

    // Mapping file errors
    #[error("Failed to parse package mapping: {path}")]
    #[diagnostic(
        code(pyreqs::mapping::parse_failed),
        help("The mapping file must be a JSON object of import-name to package-name strings")
    )]
    MappingParseFailed { path: String, reason: String },

    #[error("Invalid package mapping: {message}")]
    #[diagnostic(
        code(pyreqs::mapping::invalid),
        help("Every key and value in the mapping file must be a non-empty string")
    )]
    MappingInvalid { message: String },

    // Manifest errors
    #[error("Failed to write manifest: {path}")]
    #[diagnostic(code(pyreqs::manifest::write_failed))]
    ManifestWriteFailed { path: String, reason: String },

    // Virtual environment errors
    #[error("Failed to create virtual environment at '{path}': {reason}")]
    #[diagnostic(
        code(pyreqs::venv::create_failed),
        help("Check that a Python interpreter with the venv module is on PATH")
    )]
    VenvCreateFailed { path: String, reason: String },

    #[error("Python interpreter not found")]
    #[diagnostic(
        code(pyreqs::venv::python_not_found),
        help("Install Python 3 and make sure it is on PATH")
    )]
    PythonNotFound,

    // Prompt errors
    #[error("Failed to read confirmation: {message}")]
    #[diagnostic(code(pyreqs::prompt::failed))]
    PromptFailed { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(pyreqs::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for PyreqsError {
    fn from(err: std::io::Error) -> Self {
        PyreqsError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PyreqsError {
    fn from(err: serde_json::Error) -> Self {
        PyreqsError::MappingParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for PyreqsError {
    fn from(err: inquire::InquireError) -> Self {
        PyreqsError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PyreqsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PyreqsError::RootNotFound {
            path: "/no/such/dir".to_string(),
        };
        assert_eq!(err.to_string(), "Scan root not found: /no/such/dir");
    }

    #[test]
    fn test_error_code() {
        let err = PyreqsError::RootNotFound {
            path: "/tmp/x".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("pyreqs::scan::root_not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PyreqsError = io_err.into();
        assert!(matches!(err, PyreqsError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("not json");
        let err: PyreqsError = parse_result.unwrap_err().into();
        assert!(matches!(err, PyreqsError::MappingParseFailed { .. }));
    }

    #[test]
    fn test_mapping_invalid_error() {
        let err = PyreqsError::MappingInvalid {
            message: "value for 'cv2' must be a string".to_string(),
        };
        assert!(err.to_string().contains("Invalid package mapping"));
        assert!(err.to_string().contains("cv2"));
    }

    #[test]
    fn test_manifest_write_failed_error() {
        let err = PyreqsError::ManifestWriteFailed {
            path: "requirements.txt".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("Failed to write manifest"));
        assert!(err.to_string().contains("requirements.txt"));
    }

    #[test]
    fn test_venv_create_failed_error() {
        let err = PyreqsError::VenvCreateFailed {
            path: ".venv".to_string(),
            reason: "python exited with status 1".to_string(),
        };
        assert!(err.to_string().contains(".venv"));
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("pyreqs::venv::create_failed".to_string())
        );
    }
}

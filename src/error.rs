//! Error types for visaid.

use thiserror::Error;

/// Which remote endpoint a [`VisaidError::Remote`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEndpoint {
    Describe,
    Instruct,
}

impl std::fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteEndpoint::Describe => write!(f, "description"),
            RemoteEndpoint::Instruct => write!(f, "instruction"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VisaidError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing API key: set {var} in the environment")]
    MissingApiKey { var: String },

    // Raw command execution errors, remapped per capability by the device
    #[error("Device tool not found: {tool}")]
    DeviceToolNotFound { tool: String },

    #[error("Device permission denied: {message}")]
    DevicePermissionDenied { message: String },

    #[error("Device command failed: {message}")]
    DeviceCommandFailed { message: String },

    // Camera capture errors — fatal to the invocation
    #[error("Capture tool not found: {tool}")]
    CaptureToolNotFound { tool: String },

    #[error("Camera permission denied: {message}")]
    CapturePermissionDenied { message: String },

    #[error("Photo capture failed: {message}")]
    CaptureFailed { message: String },

    // Image preprocessing errors — fatal to the invocation
    #[error("Image not found at {path}")]
    ImageNotFound { path: String },

    #[error("Unsupported image format at {path}: {message}")]
    UnsupportedImageFormat { path: String, message: String },

    #[error("Image preprocessing failed: {message}")]
    PreprocessFailed { message: String },

    // Remote endpoint errors — recoverable at the pipeline level
    #[error("{endpoint} endpoint error (status {status:?}): {message}")]
    Remote {
        endpoint: RemoteEndpoint,
        status: Option<u16>,
        message: String,
    },

    // Speech output errors — downgraded to a flag, never fatal
    #[error("Text-to-speech failed: {message}")]
    SpeakFailed { message: String },

    #[error("Speech-to-text failed: {message}")]
    ListenFailed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VisaidError>;

impl VisaidError {
    /// True for errors that abort a pipeline invocation outright
    /// (no photo, no usable image). Remote and speech errors degrade
    /// gracefully instead.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VisaidError::CaptureToolNotFound { .. }
                | VisaidError::CapturePermissionDenied { .. }
                | VisaidError::CaptureFailed { .. }
                | VisaidError::ImageNotFound { .. }
                | VisaidError::UnsupportedImageFormat { .. }
                | VisaidError::PreprocessFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_capture_tool_not_found_display() {
        let error = VisaidError::CaptureToolNotFound {
            tool: "termux-camera-photo".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Capture tool not found: termux-camera-photo"
        );
    }

    #[test]
    fn test_image_not_found_display() {
        let error = VisaidError::ImageNotFound {
            path: "/sdcard/DCIM/visaid.jpg".to_string(),
        };
        assert_eq!(error.to_string(), "Image not found at /sdcard/DCIM/visaid.jpg");
    }

    #[test]
    fn test_unsupported_format_display() {
        let error = VisaidError::UnsupportedImageFormat {
            path: "notes.txt".to_string(),
            message: "not an image".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unsupported image format at notes.txt: not an image"
        );
    }

    #[test]
    fn test_remote_error_display_includes_endpoint_and_status() {
        let error = VisaidError::Remote {
            endpoint: RemoteEndpoint::Describe,
            status: Some(429),
            message: "rate limited".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("description"));
        assert!(display.contains("429"));
        assert!(display.contains("rate limited"));
    }

    #[test]
    fn test_missing_api_key_display() {
        let error = VisaidError::MissingApiKey {
            var: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing API key: set OPENAI_API_KEY in the environment"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(
            VisaidError::CaptureFailed {
                message: "busy".to_string()
            }
            .is_fatal()
        );
        assert!(
            VisaidError::ImageNotFound {
                path: "x.jpg".to_string()
            }
            .is_fatal()
        );
        assert!(
            !VisaidError::Remote {
                endpoint: RemoteEndpoint::Instruct,
                status: None,
                message: "unreachable".to_string()
            }
            .is_fatal()
        );
        assert!(
            !VisaidError::SpeakFailed {
                message: "tts busy".to_string()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VisaidError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: VisaidError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VisaidError>();
        assert_sync::<VisaidError>();
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(RemoteEndpoint::Describe.to_string(), "description");
        assert_eq!(RemoteEndpoint::Instruct.to_string(), "instruction");
    }
}

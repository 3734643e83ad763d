use thiserror::Error;

use crate::platform::PlatformError;

/// Client-side rejection of a picked file. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload a PDF or DOCX file")]
    UnsupportedType { media_type: String },

    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },

    #[error("Please select a resume file")]
    NoFileSelected,
}

/// Client error taxonomy. `Display` is the inline message shown to the user,
/// so backend-supplied text passes through untouched.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Score(String),

    #[error("{0}")]
    Report(String),

    #[error("{0}")]
    Download(String),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// The four backend round trips. Each maps failures onto its own error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Score,
    Report,
    Download,
}

impl Operation {
    /// Shown when the backend gives no usable `message`.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Upload => "Failed to upload resume",
            Operation::Score => "Failed to score resume",
            Operation::Report => "Failed to generate report",
            Operation::Download => "Failed to download report",
        }
    }

    pub fn error(&self, message: impl Into<String>) -> ClientError {
        let message = message.into();
        match self {
            Operation::Upload => ClientError::Upload(message),
            Operation::Score => ClientError::Score(message),
            Operation::Report => ClientError::Report(message),
            Operation::Download => ClientError::Download(message),
        }
    }

    pub fn fallback(&self) -> ClientError {
        self.error(self.fallback_message())
    }
}

use crate::config::Config;
use crate::errors::ValidationError;
use crate::models::{ResumeFile, ResumeFormat};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Client-side file checks. A convenience only: the backend has the final say.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub accepted_formats: Vec<ResumeFormat>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_formats: vec![ResumeFormat::Pdf, ResumeFormat::Docx],
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            accepted_formats: config.accepted_formats.clone(),
            ..Self::default()
        }
    }

    /// Type is checked before size. Matching is on the exact MIME string.
    pub fn check(&self, media_type: &str, size: u64) -> Result<(), ValidationError> {
        let accepted = self
            .accepted_formats
            .iter()
            .any(|format| format.mime() == media_type);
        if !accepted {
            return Err(ValidationError::UnsupportedType {
                media_type: media_type.to_string(),
            });
        }
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge { size });
        }
        Ok(())
    }

    pub fn validate(&self, file: &ResumeFile) -> Result<(), ValidationError> {
        self.check(&file.media_type, file.size())
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Resume document formats the backend knows how to extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Pdf,
    Docx,
    /// Legacy Word. Only accepted when explicitly added to the allow-list.
    Doc,
}

impl ResumeFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => PDF_MIME,
            ResumeFormat::Docx => DOCX_MIME,
            ResumeFormat::Doc => DOC_MIME,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "PDF",
            ResumeFormat::Docx => "DOCX",
            ResumeFormat::Doc => "DOC",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            PDF_MIME => Some(ResumeFormat::Pdf),
            DOCX_MIME => Some(ResumeFormat::Docx),
            DOC_MIME => Some(ResumeFormat::Doc),
            _ => None,
        }
    }

    /// Accepts either a short name (`pdf`) or an exact MIME string.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "pdf" | ".pdf" => Some(ResumeFormat::Pdf),
            "docx" | ".docx" => Some(ResumeFormat::Docx),
            "doc" | ".doc" => Some(ResumeFormat::Doc),
            other => Self::from_mime(other),
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "docx" => Some(ResumeFormat::Docx),
            "doc" => Some(ResumeFormat::Doc),
            _ => None,
        }
    }
}

/// A resume file as picked by the user: name, declared media type and content.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub media_type: String,
    pub content: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            content,
        }
    }

    /// Reads a file from disk, declaring its media type from the extension.
    /// Unknown extensions get `application/octet-stream` and fail validation later.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read resume file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        let media_type = ResumeFormat::from_file_name(&file_name)
            .map(|f| f.mime())
            .unwrap_or(UNKNOWN_MIME);

        Ok(Self::new(file_name, media_type, Bytes::from(content)))
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Size in megabytes with two decimals, as shown next to the picked file.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// POST /resume/upload response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub resume_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text_preview: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name_is_case_insensitive() {
        assert_eq!(
            ResumeFormat::from_file_name("CV_Final.PDF"),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(
            ResumeFormat::from_file_name("resume.docx"),
            Some(ResumeFormat::Docx)
        );
        assert_eq!(ResumeFormat::from_file_name("resume.txt"), None);
        assert_eq!(ResumeFormat::from_file_name("resume"), None);
    }

    #[test]
    fn test_format_mime_roundtrip() {
        for format in [ResumeFormat::Pdf, ResumeFormat::Docx, ResumeFormat::Doc] {
            assert_eq!(ResumeFormat::from_mime(format.mime()), Some(format));
        }
    }

    #[test]
    fn test_upload_response_accepts_backend_metadata() {
        let body = r#"{
            "resumeId": "5f0c7c7e-8d1c-4d7e-9b55-0f7f2b3c1a11",
            "filename": "resume.pdf",
            "storagePath": "uploads/abc.pdf",
            "extractedTextPreview": "Jane Doe, Software Engineer"
        }"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.resume_id, "5f0c7c7e-8d1c-4d7e-9b55-0f7f2b3c1a11");
        assert_eq!(parsed.filename.as_deref(), Some("resume.pdf"));
        assert_eq!(
            parsed.extracted_text_preview.as_deref(),
            Some("Jane Doe, Software Engineer")
        );
    }

    #[test]
    fn test_upload_response_minimal_body() {
        let parsed: UploadResponse = serde_json::from_str(r#"{"resumeId":"abc123"}"#).unwrap();
        assert_eq!(parsed.resume_id, "abc123");
        assert!(parsed.filename.is_none());
    }

    #[test]
    fn test_size_label_two_decimals() {
        let file = ResumeFile::new("a.pdf", PDF_MIME, Bytes::from(vec![0u8; 2 * 1024 * 1024]));
        assert_eq!(file.size(), 2 * 1024 * 1024);
        assert_eq!(file.size_label(), "2.00 MB");
    }

    #[tokio::test]
    async fn test_from_path_declares_media_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        tokio::fs::write(&path, b"PK\x03\x04").await.unwrap();

        let file = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "resume.docx");
        assert_eq!(file.media_type, DOCX_MIME);
        assert_eq!(file.size(), 4);
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.rtf");
        tokio::fs::write(&path, b"{\\rtf1}").await.unwrap();

        let file = ResumeFile::from_path(&path).await.unwrap();
        assert_eq!(file.media_type, "application/octet-stream");
    }
}

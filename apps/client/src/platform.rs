//! Platform services: the clipboard and file-save capabilities the session needs.
//!
//! The session only sees the `PlatformServices` trait, so it runs the same way
//! against the terminal implementation below and the in-memory one in tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Clipboard is not available on this system")]
    ClipboardUnavailable,

    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(String),

    #[error("Failed to save {file_name}: {source}")]
    Save {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait PlatformServices: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), PlatformError>;

    /// Persists `bytes` under `file_name` and returns where it landed.
    async fn save_blob(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf, PlatformError>;
}

/// An external program that reads clipboard content from stdin.
#[derive(Debug, Clone)]
pub struct ClipboardCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_clipboard_commands() -> Vec<ClipboardCommand> {
    vec![
        ClipboardCommand::new("pbcopy", Vec::<String>::new()),
        ClipboardCommand::new("wl-copy", Vec::<String>::new()),
        ClipboardCommand::new("xclip", ["-selection", "clipboard"]),
        ClipboardCommand::new("xsel", ["--clipboard", "--input"]),
        ClipboardCommand::new("clip.exe", Vec::<String>::new()),
    ]
}

/// Terminal implementation: blobs go to a directory on disk, text goes to the
/// first clipboard utility found on `PATH`.
#[derive(Debug, Clone)]
pub struct LocalPlatform {
    output_dir: PathBuf,
    clipboard_commands: Vec<ClipboardCommand>,
}

impl LocalPlatform {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            clipboard_commands: default_clipboard_commands(),
        }
    }

    #[cfg(test)]
    pub fn with_clipboard_commands(mut self, commands: Vec<ClipboardCommand>) -> Self {
        self.clipboard_commands = commands;
        self
    }

    async fn pipe_to(&self, command: &ClipboardCommand, text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // dropping stdin closes the pipe so the utility can exit
        }

        Ok(child.wait().await?.success())
    }
}

#[async_trait]
impl PlatformServices for LocalPlatform {
    async fn copy_text(&self, text: &str) -> Result<(), PlatformError> {
        for command in &self.clipboard_commands {
            match self.pipe_to(command, text).await {
                Ok(true) => {
                    debug!("Copied {} chars via {}", text.len(), command.program);
                    return Ok(());
                }
                Ok(false) => {
                    return Err(PlatformError::Clipboard(format!(
                        "{} exited with an error",
                        command.program
                    )))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(PlatformError::Clipboard(e.to_string())),
            }
        }
        Err(PlatformError::ClipboardUnavailable)
    }

    async fn save_blob(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf, PlatformError> {
        let save_error = |source| PlatformError::Save {
            file_name: file_name.to_string(),
            source,
        };

        // Only the final component is honoured; the blob always lands in output_dir.
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| save_error(std::io::Error::from(ErrorKind::InvalidInput)))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(save_error)?;

        let path = self.output_dir.join(name);
        tokio::fs::write(&path, bytes).await.map_err(save_error)?;

        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_blob_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().join("reports"));

        let path = platform
            .save_blob(b"%PDF-1.7", "ATS-Report.pdf")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("reports").join("ATS-Report.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_save_blob_strips_directories_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().to_path_buf());

        let path = platform
            .save_blob(b"x", "../../etc/ATS-Report.pdf")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("ATS-Report.pdf"));
    }

    #[tokio::test]
    async fn test_save_blob_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().to_path_buf());

        let err = platform.save_blob(b"x", "..").await.unwrap_err();
        assert!(matches!(err, PlatformError::Save { .. }));
    }

    #[tokio::test]
    async fn test_copy_text_without_any_utility_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().to_path_buf()).with_clipboard_commands(vec![
            ClipboardCommand::new("definitely-not-a-clipboard-tool", Vec::<String>::new()),
        ]);

        let err = platform.copy_text("tip").await.unwrap_err();
        assert!(matches!(err, PlatformError::ClipboardUnavailable));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_text_pipes_to_first_available_utility() {
        let dir = tempfile::tempdir().unwrap();
        let sink = dir.path().join("clipboard.txt");
        let platform = LocalPlatform::new(dir.path().to_path_buf()).with_clipboard_commands(vec![
            ClipboardCommand::new("definitely-not-a-clipboard-tool", Vec::<String>::new()),
            ClipboardCommand::new("sh", ["-c".to_string(), format!("cat > '{}'", sink.display())]),
        ]);

        platform.copy_text("Add more keywords").await.unwrap();

        assert_eq!(
            tokio::fs::read_to_string(&sink).await.unwrap(),
            "Add more keywords"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_text_failing_utility_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let platform = LocalPlatform::new(dir.path().to_path_buf())
            .with_clipboard_commands(vec![ClipboardCommand::new("false", Vec::<String>::new())]);

        let err = platform.copy_text("tip").await.unwrap_err();
        assert!(matches!(err, PlatformError::Clipboard(_)));
    }
}

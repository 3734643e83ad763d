use std::fmt;

use crate::session::{AnalysisSession, SessionState};
use crate::views::Palette;

pub struct UploadPage<'a> {
    pub session: &'a AnalysisSession,
    pub palette: Palette,
}

impl fmt::Display for UploadPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let palette = self.palette;

        writeln!(f, "{}", palette.bold("Upload Your Resume"))?;
        writeln!(
            f,
            "Upload your resume and get instant ATS scoring. Add a job description for targeted analysis."
        )?;
        writeln!(f)?;

        match session.state().file() {
            Some(file) => writeln!(f, "  File: {} ({})", file.file_name, file.size_label())?,
            None => {
                let accepted: Vec<&str> = session
                    .policy()
                    .accepted_formats
                    .iter()
                    .map(|format| format.label())
                    .collect();
                let max_mb = session.policy().max_bytes / (1024 * 1024);
                writeln!(f, "  No file selected.")?;
                writeln!(
                    f,
                    "  {}",
                    palette.dim(&format!(
                        "Accepted formats: {} (Max {}MB)",
                        accepted.join(", "),
                        max_mb
                    ))
                )?;
            }
        }

        let jd = session.job_description();
        if jd.trim().is_empty() {
            writeln!(f, "  Job description (optional): none")?;
        } else {
            writeln!(f, "  Job description: {} chars", jd.chars().count())?;
        }

        if let Some(error) = session.error() {
            writeln!(f)?;
            writeln!(f, "{}", palette.error(error))?;
        }

        if matches!(session.state(), SessionState::Uploading { .. }) {
            writeln!(f)?;
            writeln!(f, "Uploading & Analyzing...")?;
        }
        Ok(())
    }
}

pub fn render(session: &AnalysisSession, palette: Palette) -> String {
    UploadPage { session, palette }.to_string()
}

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api_client::ScoringBackend;
use crate::errors::ClientError;
use crate::models::ResumeFile;
use crate::platform::PlatformServices;
use crate::session::machine::{AnalysisSession, Outcome, Step};
use crate::session::validation::UploadPolicy;

pub const REPORT_FILE_NAME: &str = "ATS-Report.pdf";

/// Drives an `AnalysisSession` against the backend and platform services.
///
/// The session lock is never held across a network await, so a submission
/// made while another is in flight sees the busy state and returns `Ignored`.
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<AnalysisSession>>,
    backend: Arc<dyn ScoringBackend>,
    platform: Arc<dyn PlatformServices>,
}

impl SessionController {
    pub fn new(
        policy: UploadPolicy,
        backend: Arc<dyn ScoringBackend>,
        platform: Arc<dyn PlatformServices>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(AnalysisSession::new(policy))),
            backend,
            platform,
        }
    }

    /// A copy of the current session for rendering.
    pub async fn snapshot(&self) -> AnalysisSession {
        self.session.lock().await.clone()
    }

    pub async fn select_file(&self, file: ResumeFile) -> Outcome {
        self.session.lock().await.select_file(file)
    }

    pub async fn remove_file(&self) -> Outcome {
        self.session.lock().await.remove_file()
    }

    pub async fn set_job_description(&self, text: impl Into<String>) {
        self.session.lock().await.set_job_description(text);
    }

    pub async fn submit_upload(&self) -> Outcome {
        let ticket = match self.session.lock().await.begin_upload() {
            Step::Ready(ticket) => ticket,
            other => return skipped(other),
        };

        let result = self
            .backend
            .upload_resume(&ticket.file, ticket.job_description.as_deref())
            .await;

        self.session.lock().await.finish_upload(&ticket, result)
    }

    pub async fn submit_analysis(&self) -> Outcome {
        let ticket = match self.session.lock().await.begin_analysis() {
            Step::Ready(ticket) => ticket,
            other => return skipped(other),
        };

        let result = self.backend.score_resume(&ticket.request).await;

        self.session.lock().await.finish_analysis(&ticket, result)
    }

    pub async fn reset_results(&self) -> Outcome {
        self.session.lock().await.reset_results()
    }

    pub async fn start_over(&self) -> Outcome {
        self.session.lock().await.start_over()
    }

    pub async fn open_dashboard(&self, resume_id: &str) -> Outcome {
        self.session.lock().await.open_dashboard(resume_id)
    }

    /// Requests a report, downloads it and saves it as `ATS-Report.pdf`.
    pub async fn download_report(&self) -> Outcome {
        let ticket = match self.session.lock().await.begin_report() {
            Step::Ready(ticket) => ticket,
            other => return skipped(other),
        };

        let result = self.fetch_and_save_report(&ticket.request).await;

        self.session.lock().await.finish_report(&ticket, result)
    }

    async fn fetch_and_save_report(
        &self,
        request: &crate::models::ReportRequest,
    ) -> Result<std::path::PathBuf, ClientError> {
        let report = self.backend.request_report(request).await?;
        debug!("Report {} ready at {}", report.report_id, report.download_url);
        let bytes = self.backend.download_report(&report.report_id).await?;
        let path = self.platform.save_blob(&bytes, REPORT_FILE_NAME).await?;
        Ok(path)
    }

    /// Copies tip `number` (1-based) to the clipboard.
    pub async fn copy_tip(&self, number: usize) -> Outcome {
        let tip = match self.session.lock().await.tip(number) {
            Some(tip) => tip.to_string(),
            None => return Outcome::Ignored,
        };

        match self.platform.copy_text(&tip).await {
            Ok(()) => {
                info!("Copied tip {}", number);
                self.session
                    .lock()
                    .await
                    .mark_tip_copied(number, Instant::now());
                Outcome::Applied
            }
            Err(e) => self
                .session
                .lock()
                .await
                .reject(ClientError::from(e).to_string()),
        }
    }
}

fn skipped<T>(step: Step<T>) -> Outcome {
    match step {
        Step::Rejected(message) => Outcome::Rejected(message),
        Step::Busy => {
            debug!("Request already in flight, ignoring submission");
            Outcome::Ignored
        }
        Step::Ready(_) | Step::Unavailable => Outcome::Ignored,
    }
}

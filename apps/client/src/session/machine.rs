use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{ClientError, ValidationError};
use crate::models::{ReportRequest, ResumeFile, ScoreRequest, ScoreResult, UploadResponse};
use crate::session::state::{Route, SessionState};
use crate::session::validation::UploadPolicy;

/// How long a copied tip keeps its acknowledgement mark.
pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

/// Result of asking the session to start a network-issuing transition.
#[derive(Debug)]
pub enum Step<T> {
    /// The session moved into its busy state; issue exactly this request.
    Ready(T),
    /// A request is already in flight. Nothing changed.
    Busy,
    /// The guard failed; the message is now the session error.
    Rejected(String),
    /// Not offered from the current state. Nothing changed.
    Unavailable,
}

/// Result of a completed transition, for the view to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    Navigated(Route),
    Saved(PathBuf),
    Rejected(String),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub generation: u64,
    pub file: ResumeFile,
    pub job_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScoreTicket {
    pub generation: u64,
    pub request: ScoreRequest,
}

#[derive(Debug, Clone)]
pub struct ReportTicket {
    pub generation: u64,
    pub request: ReportRequest,
}

/// The single in-memory state slice of one analysis session.
///
/// Transitions that hit the network are split into `begin_*` (guard + enter
/// busy state, hand out a ticket) and `finish_*` (apply the response). Tickets
/// carry the session generation so a response arriving after `start_over`
/// is dropped instead of landing in a fresh session.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    policy: UploadPolicy,
    state: SessionState,
    route: Route,
    error: Option<String>,
    job_description: String,
    upload_info: Option<UploadResponse>,
    report_in_flight: bool,
    last_report: Option<PathBuf>,
    copied_tip: Option<(usize, Instant)>,
    generation: u64,
}

impl AnalysisSession {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            state: SessionState::Idle,
            route: Route::Upload,
            error: None,
            job_description: String::new(),
            upload_info: None,
            report_in_flight: false,
            last_report: None,
            copied_tip: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn upload_info(&self) -> Option<&UploadResponse> {
        self.upload_info.as_ref()
    }

    pub fn last_report(&self) -> Option<&PathBuf> {
        self.last_report.as_ref()
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn is_busy(&self) -> bool {
        self.report_in_flight
            || matches!(
                self.state,
                SessionState::Uploading { .. } | SessionState::Analyzing { .. }
            )
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    /// Select or drop a file. Rejections leave the state untouched.
    pub fn select_file(&mut self, file: ResumeFile) -> Outcome {
        if !matches!(
            self.state,
            SessionState::Idle | SessionState::FileSelected { .. }
        ) {
            return Outcome::Ignored;
        }

        if let Err(e) = self.policy.validate(&file) {
            debug!("Rejected {} ({}): {}", file.file_name, file.media_type, e);
            return self.reject(e.to_string());
        }

        info!("Selected {} ({})", file.file_name, file.size_label());
        self.state = SessionState::FileSelected { file };
        self.error = None;
        Outcome::Applied
    }

    pub fn remove_file(&mut self) -> Outcome {
        match self.state {
            SessionState::FileSelected { .. } => {
                self.state = SessionState::Idle;
                Outcome::Applied
            }
            _ => Outcome::Ignored,
        }
    }

    pub fn begin_upload(&mut self) -> Step<UploadTicket> {
        if self.is_busy() {
            return Step::Busy;
        }
        match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::FileSelected { file } => {
                self.error = None;
                self.state = SessionState::Uploading { file: file.clone() };
                Step::Ready(UploadTicket {
                    generation: self.generation,
                    file,
                    job_description: non_blank(&self.job_description),
                })
            }
            SessionState::Idle => {
                let message = ValidationError::NoFileSelected.to_string();
                self.error = Some(message.clone());
                Step::Rejected(message)
            }
            other => {
                debug!("Upload not offered from {}", other.name());
                self.state = other;
                Step::Unavailable
            }
        }
    }

    pub fn finish_upload(
        &mut self,
        ticket: &UploadTicket,
        result: Result<UploadResponse, ClientError>,
    ) -> Outcome {
        if ticket.generation != self.generation {
            debug!("Dropping upload response from a discarded session");
            return Outcome::Ignored;
        }
        let file = match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Uploading { file } => file,
            other => {
                self.state = other;
                return Outcome::Ignored;
            }
        };

        match result {
            Ok(response) => {
                info!("Uploaded {} as resume {}", file.file_name, response.resume_id);
                let route = Route::Dashboard {
                    resume_id: response.resume_id.clone(),
                };
                self.state = SessionState::AwaitingAnalysis {
                    resume_id: response.resume_id.clone(),
                };
                self.upload_info = Some(response);
                self.route = route.clone();
                self.error = None;
                Outcome::Navigated(route)
            }
            Err(e) => {
                self.state = SessionState::FileSelected { file };
                self.reject(e.to_string())
            }
        }
    }

    /// An empty job description is allowed and asks for general feedback.
    pub fn begin_analysis(&mut self) -> Step<ScoreTicket> {
        if self.is_busy() {
            return Step::Busy;
        }
        let resume_id = match &self.state {
            SessionState::AwaitingAnalysis { resume_id } => resume_id.clone(),
            other => {
                debug!("Analysis not offered from {}", other.name());
                return Step::Unavailable;
            }
        };

        self.error = None;
        self.state = SessionState::Analyzing {
            resume_id: resume_id.clone(),
        };
        Step::Ready(ScoreTicket {
            generation: self.generation,
            request: ScoreRequest {
                resume_id,
                job_description: Some(self.job_description.clone()),
            },
        })
    }

    pub fn finish_analysis(
        &mut self,
        ticket: &ScoreTicket,
        result: Result<ScoreResult, ClientError>,
    ) -> Outcome {
        if ticket.generation != self.generation {
            debug!("Dropping score response from a discarded session");
            return Outcome::Ignored;
        }
        let resume_id = match &self.state {
            SessionState::Analyzing { resume_id } => resume_id.clone(),
            _ => return Outcome::Ignored,
        };

        match result {
            Ok(result) => {
                info!(
                    "Resume {} scored {:.1} overall",
                    resume_id, result.overall
                );
                self.state = SessionState::ResultsShown {
                    resume_id,
                    result,
                    received_at: Utc::now(),
                };
                self.error = None;
                Outcome::Applied
            }
            Err(e) => {
                self.state = SessionState::AwaitingAnalysis { resume_id };
                self.reject(e.to_string())
            }
        }
    }

    /// Drop the result but keep the resume, so another job description can be scored.
    pub fn reset_results(&mut self) -> Outcome {
        if self.is_busy() {
            return Outcome::Ignored;
        }
        let resume_id = match &self.state {
            SessionState::ResultsShown { resume_id, .. } => resume_id.clone(),
            _ => return Outcome::Ignored,
        };
        self.state = SessionState::AwaitingAnalysis { resume_id };
        self.copied_tip = None;
        self.error = None;
        Outcome::Applied
    }

    /// Discard everything and go back to the upload page.
    pub fn start_over(&mut self) -> Outcome {
        let policy = self.policy.clone();
        let generation = self.generation + 1;
        *self = AnalysisSession::new(policy);
        self.generation = generation;
        Outcome::Navigated(Route::Upload)
    }

    /// Land directly on the dashboard of an already uploaded resume.
    pub fn open_dashboard(&mut self, resume_id: impl Into<String>) -> Outcome {
        let resume_id = resume_id.into();
        if resume_id.trim().is_empty() {
            return Outcome::Ignored;
        }
        let job_description = mem::take(&mut self.job_description);
        self.start_over();
        self.job_description = job_description;
        self.state = SessionState::AwaitingAnalysis {
            resume_id: resume_id.clone(),
        };
        self.route = Route::Dashboard { resume_id };
        Outcome::Navigated(self.route.clone())
    }

    pub fn begin_report(&mut self) -> Step<ReportTicket> {
        if self.is_busy() {
            return Step::Busy;
        }
        let resume_id = match &self.state {
            SessionState::AwaitingAnalysis { resume_id }
            | SessionState::ResultsShown { resume_id, .. } => resume_id.clone(),
            other => {
                debug!("Report not offered from {}", other.name());
                return Step::Unavailable;
            }
        };

        self.error = None;
        self.report_in_flight = true;
        Step::Ready(ReportTicket {
            generation: self.generation,
            request: ReportRequest {
                resume_id,
                job_description: non_blank(&self.job_description),
            },
        })
    }

    pub fn finish_report(
        &mut self,
        ticket: &ReportTicket,
        result: Result<PathBuf, ClientError>,
    ) -> Outcome {
        if ticket.generation != self.generation || !self.report_in_flight {
            return Outcome::Ignored;
        }
        self.report_in_flight = false;

        match result {
            Ok(path) => {
                self.last_report = Some(path.clone());
                self.error = None;
                Outcome::Saved(path)
            }
            Err(e) => self.reject(e.to_string()),
        }
    }

    /// Text of tip `number` (1-based) when results are on screen.
    pub fn tip(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.state
            .result()
            .and_then(|r| r.improvement_tips.get(index))
            .map(String::as_str)
    }

    pub fn mark_tip_copied(&mut self, number: usize, at: Instant) {
        self.copied_tip = Some((number, at));
    }

    /// The tip showing a "copied" mark at `now`, if its window is still open.
    pub fn copied_tip(&self, now: Instant) -> Option<usize> {
        self.copied_tip
            .filter(|(_, at)| now.saturating_duration_since(*at) < COPY_ACK_WINDOW)
            .map(|(number, _)| number)
    }

    pub fn reject(&mut self, message: String) -> Outcome {
        warn!("{}", message);
        self.error = Some(message.clone());
        Outcome::Rejected(message)
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

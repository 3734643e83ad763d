use std::fmt;

use chrono::{DateTime, Utc};

use crate::models::{ResumeFile, ScoreResult};

/// Lifecycle of one analysis session.
///
/// `Uploading` and `Analyzing` double as the busy flag: while either is held,
/// any further submission is a no-op.
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    FileSelected {
        file: ResumeFile,
    },
    Uploading {
        file: ResumeFile,
    },
    AwaitingAnalysis {
        resume_id: String,
    },
    Analyzing {
        resume_id: String,
    },
    ResultsShown {
        resume_id: String,
        result: ScoreResult,
        received_at: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::FileSelected { .. } => "file_selected",
            SessionState::Uploading { .. } => "uploading",
            SessionState::AwaitingAnalysis { .. } => "awaiting_analysis",
            SessionState::Analyzing { .. } => "analyzing",
            SessionState::ResultsShown { .. } => "results_shown",
        }
    }

    pub fn resume_id(&self) -> Option<&str> {
        match self {
            SessionState::AwaitingAnalysis { resume_id }
            | SessionState::Analyzing { resume_id }
            | SessionState::ResultsShown { resume_id, .. } => Some(resume_id),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&ResumeFile> {
        match self {
            SessionState::FileSelected { file } | SessionState::Uploading { file } => Some(file),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        match self {
            SessionState::ResultsShown { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Page the view should be showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    Dashboard { resume_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Upload => "/upload".to_string(),
            Route::Dashboard { resume_id } => format!("/dashboard/{resume_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

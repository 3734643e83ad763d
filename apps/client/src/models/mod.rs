pub mod report;
pub mod resume;
pub mod score;

pub use report::{ReportRequest, ReportResponse};
pub use resume::{ResumeFile, ResumeFormat, UploadResponse};
pub use score::{ScoreRequest, ScoreResult};

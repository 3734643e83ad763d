//! Analysis session: the client-side state machine behind the upload and
//! dashboard pages.

pub mod controller;
pub mod machine;
pub mod state;
pub mod validation;

pub use controller::SessionController;
pub use machine::{AnalysisSession, Outcome};
pub use state::{Route, SessionState};
pub use validation::UploadPolicy;

//! Terminal pages. Each page is a pure function from session state to text;
//! printing and animation happen in the CLI layer.

pub mod about;
pub mod dashboard;
pub mod upload;

use std::time::Instant;

use crossterm::style::{style, Color, StyledContent, Stylize};

use crate::presentation::{RingGeometry, ScoreBand};
use crate::session::{AnalysisSession, Route};

const GAUGE_WIDTH: usize = 30;

/// Terminal styling, switched off when stdout is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn styled() -> Self {
        Self { enabled: true }
    }

    fn paint<F>(&self, text: &str, apply: F) -> String
    where
        F: FnOnce(StyledContent<&str>) -> StyledContent<&str>,
    {
        if self.enabled {
            apply(style(text)).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn band(&self, band: ScoreBand, text: &str) -> String {
        self.paint(text, |s| s.with(band.stroke_color()))
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |s| s.bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dim())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(&format!("✗ {text}"), |s| s.with(Color::Red))
    }
}

/// Horizontal stand-in for the score ring: the filled share follows the
/// ring's dash offset.
pub fn gauge(display: f64, width: usize) -> String {
    let ring = RingGeometry::default();
    let filled = (ring.filled_fraction(display) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn score_gauge(display: f64) -> String {
    gauge(display, GAUGE_WIDTH)
}

/// Renders whatever page the session's route points at.
pub fn render_current(session: &AnalysisSession, palette: Palette, now: Instant) -> String {
    match session.route() {
        Route::Upload => upload::render(session, palette),
        Route::Dashboard { .. } => dashboard::render(session, palette, now),
    }
}

use std::fmt;
use std::time::Instant;

use crate::models::ScoreResult;
use crate::presentation::{
    format_percent, numbered_tips, radar_data, score_breakdown, score_color, score_label,
    score_summary, tips_summary, NO_TIPS_MESSAGE,
};
use crate::session::{AnalysisSession, SessionState};
use crate::views::{gauge, score_gauge, Palette};

const PREVIEW_CHARS: usize = 160;

pub struct DashboardPage<'a> {
    pub session: &'a AnalysisSession,
    pub palette: Palette,
    pub now: Instant,
}

impl fmt::Display for DashboardPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let palette = self.palette;

        writeln!(f, "{}", palette.bold("Resume Analysis Dashboard"))?;
        if let Some(resume_id) = session.state().resume_id() {
            writeln!(f, "Resume: {resume_id}")?;
        }
        if let Some(info) = session.upload_info() {
            if let Some(name) = &info.filename {
                writeln!(f, "File: {name}")?;
            }
            if let Some(preview) = &info.extracted_text_preview {
                writeln!(f, "{}", palette.dim(&truncate(preview, PREVIEW_CHARS)))?;
            }
        }
        writeln!(f)?;

        match session.state() {
            SessionState::ResultsShown {
                result,
                received_at,
                ..
            } => {
                let card = ResultsCard {
                    result,
                    palette,
                    display_overall: result.overall,
                    copied_tip: session.copied_tip(self.now),
                };
                write!(f, "{card}")?;
                let analyzed = format!("Analyzed {}", received_at.format("%Y-%m-%d %H:%M UTC"));
                writeln!(f, "{}", palette.dim(&analyzed))?;
            }
            SessionState::Analyzing { .. } => writeln!(f, "Analyzing...")?,
            _ => {
                writeln!(f, "{}", palette.bold("Analyze Your Resume"))?;
                writeln!(
                    f,
                    "Enter a job description to analyze how well your resume matches the requirements,"
                )?;
                writeln!(f, "or leave it empty for general feedback.")?;
                let jd = session.job_description();
                if jd.trim().is_empty() {
                    writeln!(f, "  Job description: none (general feedback)")?;
                } else {
                    writeln!(f, "  Job description: {}", truncate(jd, PREVIEW_CHARS))?;
                }
            }
        }

        if let Some(path) = session.last_report() {
            writeln!(f, "Report saved to {}", path.display())?;
        }
        if let Some(error) = session.error() {
            writeln!(f)?;
            writeln!(f, "{}", palette.error(error))?;
        }
        Ok(())
    }
}

pub fn render(session: &AnalysisSession, palette: Palette, now: Instant) -> String {
    DashboardPage {
        session,
        palette,
        now,
    }
    .to_string()
}

/// Score card, breakdown and tips. `display_overall` is the ring's current
/// animated value; label and colour always follow the real score.
pub struct ResultsCard<'a> {
    pub result: &'a ScoreResult,
    pub palette: Palette,
    pub display_overall: f64,
    pub copied_tip: Option<usize>,
}

impl fmt::Display for ResultsCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let palette = self.palette;
        let band = score_color(result.overall);

        writeln!(f, "{}", palette.bold("Overall ATS Score"))?;
        writeln!(f, "{}", score_line(result.overall, self.display_overall, palette))?;
        writeln!(f, "  {}", palette.band(band, score_label(result.overall)))?;
        writeln!(f, "  {}", score_summary(result.overall))?;
        writeln!(f)?;

        writeln!(f, "{}", palette.bold("Score Breakdown"))?;
        for point in radar_data(result) {
            writeln!(
                f,
                "  {:<9}{} {:>3.0}/{:.0}",
                point.category,
                gauge(point.score, 20),
                point.score,
                point.full_mark
            )?;
        }
        for (label, score) in score_breakdown(result) {
            writeln!(
                f,
                "  {:<17}{}",
                label,
                palette.band(score_color(score), &format_percent(Some(score)))
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{}", palette.bold("Improvement Recommendations"))?;
        if result.improvement_tips.is_empty() {
            return writeln!(f, "  {NO_TIPS_MESSAGE}");
        }
        for tip in numbered_tips(&result.improvement_tips) {
            let mark = if self.copied_tip == Some(tip.number) { " ✓ copied" } else { "" };
            writeln!(f, "  {:>2}. {}{}", tip.number, tip.text, mark)?;
        }
        writeln!(
            f,
            "  {}",
            palette.dim(&tips_summary(result.improvement_tips.len()))
        )
    }
}

/// The ring line, redrawn on every animation frame. Whole numbers while
/// easing; the settled frame shows the score as received.
pub fn score_line(overall: f64, display: f64, palette: Palette) -> String {
    let band = score_color(overall);
    format!(
        "  {} {} / 100",
        score_gauge(display),
        palette.band(band, &format!("{display:>3}"))
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

//! Result presentation: pure transforms from a `ScoreResult` into display values.
//!
//! Nothing in here performs I/O; the ring animation is the only piece that
//! spawns work, and it is purely cosmetic.

pub mod chart;
pub mod ring;
pub mod tips;

use crossterm::style::Color;
use serde::Serialize;

pub use chart::{radar_data, score_breakdown};
pub use ring::{RingGeometry, ScoreRingAnimation};
pub use tips::{numbered_tips, tips_summary, NO_TIPS_MESSAGE};

const HIGH_THRESHOLD: f64 = 80.0;
const MID_THRESHOLD: f64 = 60.0;
const FAIR_THRESHOLD: f64 = 40.0;

/// Colour band for a score. Boundaries are inclusive on the low side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Mid,
    High,
}

impl ScoreBand {
    /// Stroke colour of the score ring. Terminal views paint the score with it.
    pub fn stroke_color(&self) -> Color {
        match self {
            ScoreBand::Low => Color::Rgb {
                r: 0xdc,
                g: 0x26,
                b: 0x26,
            },
            ScoreBand::Mid => Color::Rgb {
                r: 0xca,
                g: 0x8a,
                b: 0x04,
            },
            ScoreBand::High => Color::Rgb {
                r: 0x16,
                g: 0xa3,
                b: 0x4a,
            },
        }
    }
}

pub fn score_color(score: f64) -> ScoreBand {
    if score >= HIGH_THRESHOLD {
        ScoreBand::High
    } else if score >= MID_THRESHOLD {
        ScoreBand::Mid
    } else {
        ScoreBand::Low
    }
}

pub fn score_label(score: f64) -> &'static str {
    if score >= HIGH_THRESHOLD {
        "Excellent"
    } else if score >= MID_THRESHOLD {
        "Good"
    } else if score >= FAIR_THRESHOLD {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

/// One-sentence verdict shown under the score ring.
pub fn score_summary(score: f64) -> &'static str {
    if score >= HIGH_THRESHOLD {
        "Your resume is highly optimized for ATS systems!"
    } else if score >= MID_THRESHOLD {
        "Your resume has good ATS compatibility with room for improvement."
    } else if score >= FAIR_THRESHOLD {
        "Your resume needs some optimization to pass ATS filters."
    } else {
        "Your resume requires significant improvements for ATS systems."
    }
}

/// One decimal place. Absent or non-finite scores render as `0.0`.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        // + 0.0 folds a negative zero into positive zero
        Some(s) if s.is_finite() => format!("{:.1}", s + 0.0),
        _ => "0.0".to_string(),
    }
}

pub fn format_percent(score: Option<f64>) -> String {
    format!("{}%", format_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_rank(label: &str) -> usize {
        ["Needs Improvement", "Fair", "Good", "Excellent"]
            .iter()
            .position(|l| *l == label)
            .expect("label outside the fixed set")
    }

    #[test]
    fn test_score_color_boundaries() {
        assert_eq!(score_color(0.0), ScoreBand::Low);
        assert_eq!(score_color(59.99), ScoreBand::Low);
        assert_eq!(score_color(60.0), ScoreBand::Mid);
        assert_eq!(score_color(79.99), ScoreBand::Mid);
        assert_eq!(score_color(80.0), ScoreBand::High);
        assert_eq!(score_color(100.0), ScoreBand::High);
    }

    #[test]
    fn test_score_label_boundaries() {
        assert_eq!(score_label(39.9), "Needs Improvement");
        assert_eq!(score_label(40.0), "Fair");
        assert_eq!(score_label(59.9), "Fair");
        assert_eq!(score_label(60.0), "Good");
        assert_eq!(score_label(79.9), "Good");
        assert_eq!(score_label(80.0), "Excellent");
    }

    #[test]
    fn test_score_label_monotonic() {
        let mut previous = 0;
        for step in -100..=1100 {
            let score = step as f64 / 10.0;
            let rank = label_rank(score_label(score));
            assert!(rank >= previous, "label rank dropped at {score}");
            previous = rank;
        }
        assert_eq!(previous, 3);
    }

    #[test]
    fn test_band_ordering_follows_score() {
        assert!(score_color(10.0) < score_color(65.0));
        assert!(score_color(65.0) < score_color(95.0));
        assert_eq!(
            ScoreBand::High.stroke_color(),
            Color::Rgb {
                r: 0x16,
                g: 0xa3,
                b: 0x4a
            }
        );
    }

    #[test]
    fn test_score_summary_bands() {
        assert!(score_summary(85.0).contains("highly optimized"));
        assert!(score_summary(72.5).contains("good ATS compatibility"));
        assert!(score_summary(45.0).contains("some optimization"));
        assert!(score_summary(12.0).contains("significant improvements"));
    }

    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(Some(72.5)), "72.5");
        assert_eq!(format_score(Some(65.0)), "65.0");
        assert_eq!(format_score(Some(99.96)), "100.0");
        assert_eq!(format_score(Some(0.04)), "0.0");
        assert_eq!(format_score(Some(-0.0)), "0.0");
    }

    #[test]
    fn test_format_score_roundtrips_one_decimal() {
        for tenths in 0..=1000 {
            let score = tenths as f64 / 10.0;
            let formatted = format_score(Some(score));
            let parsed: f64 = formatted.parse().unwrap();
            assert!((parsed - score).abs() < 1e-9, "{score} -> {formatted}");
            assert_eq!(formatted.split('.').nth(1).map(str::len), Some(1));
        }
    }

    #[test]
    fn test_format_score_non_numeric_is_zero() {
        assert_eq!(format_score(None), "0.0");
        assert_eq!(format_score(Some(f64::NAN)), "0.0");
        assert_eq!(format_score(Some(f64::INFINITY)), "0.0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(80.0)), "80.0%");
        assert_eq!(format_percent(None), "0.0%");
    }

    #[test]
    fn test_example_result_is_good_and_mid() {
        assert_eq!(score_label(72.5), "Good");
        assert_eq!(score_color(72.5), ScoreBand::Mid);
    }
}

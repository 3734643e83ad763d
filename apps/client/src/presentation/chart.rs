use serde::Serialize;

use crate::models::ScoreResult;

pub const FULL_MARK: f64 = 100.0;

/// One axis of the radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub category: &'static str,
    pub score: f64,
    pub full_mark: f64,
}

/// Fixed three-axis shape: Keywords, Skills, Format.
pub fn radar_data(result: &ScoreResult) -> [RadarPoint; 3] {
    [
        point("Keywords", result.keyword_match),
        point("Skills", result.skill_relevance),
        point("Format", result.formatting),
    ]
}

/// Labelled sub-scores in display order, for the breakdown list under the chart.
pub fn score_breakdown(result: &ScoreResult) -> [(&'static str, f64); 3] {
    [
        ("Keyword Match", result.keyword_match),
        ("Skill Relevance", result.skill_relevance),
        ("Formatting", result.formatting),
    ]
}

fn point(category: &'static str, score: f64) -> RadarPoint {
    RadarPoint {
        category,
        score: if score.is_finite() { score } else { 0.0 },
        full_mark: FULL_MARK,
    }
}

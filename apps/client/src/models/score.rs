use serde::{Deserialize, Serialize};

/// POST /resume/score request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub resume_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

/// Scores are percentages in [0, 100]. Absent sub-scores read as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    #[serde(default)]
    pub overall: f64,
    #[serde(default)]
    pub keyword_match: f64,
    #[serde(default)]
    pub skill_relevance: f64,
    #[serde(default)]
    pub formatting: f64,
    #[serde(default)]
    pub improvement_tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_request_serializes_camel_case() {
        let req = ScoreRequest {
            resume_id: "abc123".to_string(),
            job_description: Some(String::new()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["resumeId"], "abc123");
        assert_eq!(json["jobDescription"], "");
    }

    #[test]
    fn test_score_request_omits_missing_job_description() {
        let req = ScoreRequest {
            resume_id: "abc123".to_string(),
            job_description: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"resumeId":"abc123"}"#);
    }

    #[test]
    fn test_score_result_parses_backend_payload() {
        let body = r#"{
            "overall": 72.5,
            "keywordMatch": 65.0,
            "skillRelevance": 80.0,
            "formatting": 75.0,
            "improvementTips": ["Add more keywords"]
        }"#;
        let result: ScoreResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.overall, 72.5);
        assert_eq!(result.keyword_match, 65.0);
        assert_eq!(result.skill_relevance, 80.0);
        assert_eq!(result.formatting, 75.0);
        assert_eq!(result.improvement_tips, vec!["Add more keywords"]);
    }

    #[test]
    fn test_score_result_missing_fields_default_to_zero() {
        let result: ScoreResult = serde_json::from_str(r#"{"overall": 50}"#).unwrap();
        assert_eq!(result.overall, 50.0);
        assert_eq!(result.keyword_match, 0.0);
        assert!(result.improvement_tips.is_empty());
    }
}

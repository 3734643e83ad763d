use serde::{Deserialize, Serialize};

/// POST /resume/report request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub resume_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report_id: String,
    pub download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_response_parses() {
        let body = r#"{"reportId":"rep-9","downloadUrl":"/api/report/download/rep-9"}"#;
        let parsed: ReportResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.report_id, "rep-9");
        assert_eq!(parsed.download_url, "/api/report/download/rep-9");
    }
}

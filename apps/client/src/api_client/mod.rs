/// ATS API client: the single point of entry for all scoring-backend calls.
///
/// Every operation is one request/response round trip: no retry, no backoff,
/// no caching. Failures are converted here into the per-operation
/// `ClientError` variant carrying the backend's `message` or a fixed fallback.
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{ClientError, Operation};
use crate::models::{
    ReportRequest, ReportResponse, ResumeFile, ScoreRequest, ScoreResult, UploadResponse,
};

const UPLOAD_ENDPOINT: &str = "/resume/upload";
const SCORE_ENDPOINT: &str = "/resume/score";
const REPORT_ENDPOINT: &str = "/resume/report";
const DOWNLOAD_REPORT_ENDPOINT: &str = "/resume/report/download";

/// The backend contract consumed by the analysis session.
/// `AtsApiClient` is the HTTP implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    async fn upload_resume(
        &self,
        file: &ResumeFile,
        job_description: Option<&str>,
    ) -> Result<UploadResponse, ClientError>;

    async fn score_resume(&self, request: &ScoreRequest) -> Result<ScoreResult, ClientError>;

    async fn request_report(&self, request: &ReportRequest)
        -> Result<ReportResponse, ClientError>;

    async fn download_report(&self, report_id: &str) -> Result<Bytes, ClientError>;
}

/// Spring-style error body; only `message` is of interest.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct AtsApiClient {
    client: Client,
    base_url: String,
}

impl AtsApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn download_url(&self, report_id: &str) -> Option<Url> {
        if report_id.trim().is_empty() {
            return None;
        }
        let mut url = Url::parse(&self.endpoint(DOWNLOAD_REPORT_ENDPOINT)).ok()?;
        url.path_segments_mut().ok()?.push(report_id);
        Some(url)
    }

    async fn post_json<T, R>(&self, op: Operation, path: &str, payload: &T) -> Result<R, ClientError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        info!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| transport_failure(op, e))?;

        decode_json(op, response).await
    }
}

#[async_trait]
impl ScoringBackend for AtsApiClient {
    async fn upload_resume(
        &self,
        file: &ResumeFile,
        job_description: Option<&str>,
    ) -> Result<UploadResponse, ClientError> {
        let op = Operation::Upload;
        let url = self.endpoint(UPLOAD_ENDPOINT);

        let part = Part::bytes(file.content.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| {
                warn!("Invalid media type {:?}: {}", file.media_type, e);
                op.fallback()
            })?;

        let mut form = Form::new().part("file", part);
        if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
            form = form.text("jobDescription", jd.to_string());
        }

        info!(
            "POST {} ({}, {} bytes)",
            url,
            file.file_name,
            file.size()
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_failure(op, e))?;

        decode_json(op, response).await
    }

    async fn score_resume(&self, request: &ScoreRequest) -> Result<ScoreResult, ClientError> {
        self.post_json(Operation::Score, SCORE_ENDPOINT, request)
            .await
    }

    async fn request_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportResponse, ClientError> {
        self.post_json(Operation::Report, REPORT_ENDPOINT, request)
            .await
    }

    async fn download_report(&self, report_id: &str) -> Result<Bytes, ClientError> {
        let op = Operation::Download;
        let url = self.download_url(report_id).ok_or_else(|| {
            warn!("Cannot build download URL for report {:?}", report_id);
            op.fallback()
        })?;
        info!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/pdf")
            .send()
            .await
            .map_err(|e| transport_failure(op, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(op, response).await);
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read report body: {}", e);
            op.fallback()
        })?;
        debug!("Downloaded report {} ({} bytes)", report_id, bytes.len());
        Ok(bytes)
    }
}

async fn decode_json<R: DeserializeOwned>(op: Operation, response: Response) -> Result<R, ClientError> {
    let status = response.status();
    debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(failure(op, response).await);
    }

    let body = response.text().await.map_err(|e| {
        warn!("Failed to read response body: {}", e);
        op.fallback()
    })?;

    serde_json::from_str(&body).map_err(|e| {
        warn!("Unexpected response body ({}): {}", e, body);
        op.fallback()
    })
}

/// Converts a non-success response into the operation's error, preferring the
/// backend-supplied message.
async fn failure(op: Operation, response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("Backend returned {}: {}", status, body);

    match backend_message(&body) {
        Some(message) => op.error(message),
        None => op.fallback(),
    }
}

fn transport_failure(op: Operation, error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        warn!("Request timed out: {}", error);
    } else {
        warn!("HTTP error: {}", error);
    }
    op.fallback()
}

fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

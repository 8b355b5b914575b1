use super::types::{Article, AnalysisResult, AnalyzeRequest, ArticleFilters, ErrorBody};
use super::NewsApi;
use crate::util::strip_control_chars;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Largest response body accepted from the service.
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Service error (status {status}): {detail}")]
    Service { status: u16, detail: String },
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Human-readable message for the user.
    ///
    /// Service errors yield the server's own `detail` text, with terminal
    /// control sequences removed.
    pub fn detail(&self) -> String {
        let text = match self {
            ApiError::NotFound { detail } | ApiError::Service { detail, .. } => detail.clone(),
            other => other.to_string(),
        };
        strip_control_chars(&text).into_owned()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Network, framing and decoding failures, as opposed to answers from the service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::ResponseTooLarge(_)
        )
    }
}

/// Follow at most 3 redirects and stop on loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }
        tracing::debug!(to = %url, hop = attempt.previous().len() + 1, "Following redirect");
        attempt.follow()
    })
}

/// Parse and check a service base URL (absolute http/https, hierarchical path).
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{raw}: unsupported scheme '{scheme}'"
            )))
        }
    }
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(format!("{raw}: not a base URL")));
    }
    Ok(url)
}

/// reqwest-backed client for the analysis service.
///
/// Cheap to clone: the inner `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for `base_url`.
    ///
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;
        tracing::debug!(base_url = %base_url, "Configured analysis service client");
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base path, tolerating a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let detail = error_detail(status, &bytes);
        tracing::warn!(status = status.as_u16(), detail = %detail, "Service returned an error");
        if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound { detail })
        } else {
            Err(ApiError::Service {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

impl NewsApi for ApiClient {
    async fn list_articles(&self, filters: &ArticleFilters) -> Result<Vec<Article>, ApiError> {
        let mut url = self.endpoint(&["articles"])?;
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters.query_pairs());
        }
        tracing::debug!(url = %url, "Listing articles");
        self.fetch(self.http.get(url)).await
    }

    async fn get_article(&self, id: i64) -> Result<Article, ApiError> {
        let url = self.endpoint(&["articles", &id.to_string()])?;
        tracing::debug!(url = %url, "Fetching article");
        self.fetch(self.http.get(url)).await
    }

    async fn get_analyses(&self, article_id: i64) -> Result<Vec<AnalysisResult>, ApiError> {
        let url = self.endpoint(&["articles", &article_id.to_string(), "analyses"])?;
        tracing::debug!(url = %url, "Fetching analyses");
        self.fetch(self.http.get(url)).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
        let mut url = self.endpoint(&["analyze"])?;
        if let Some(article_id) = request.article_id() {
            url.query_pairs_mut()
                .append_pair("article_id", &article_id.to_string());
        }
        let body = serde_json::to_vec(&request.body())?;
        tracing::debug!(url = %url, "Requesting analysis");
        self.fetch(
            self.http
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }
}

/// Extract the service's `detail` message from an error body.
fn error_detail(status: StatusCode, bytes: &[u8]) -> String {
    let fallback = || format!("HTTP error: status {}", status.as_u16());
    match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        Ok(ErrorBody {
            detail: Some(serde_json::Value::Null),
        })
        | Ok(ErrorBody { detail: None }) => fallback(),
        Ok(ErrorBody {
            detail: Some(structured),
        }) => structured.to_string(),
        Err(_) => fallback(),
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

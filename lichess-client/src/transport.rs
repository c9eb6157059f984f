//! HTTP transport: one authorized `reqwest` client, request building, status
//! checking, and NDJSON line reading.

use std::fmt;
use std::pin::Pin;

use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Line reader over a streamed response body.
pub(crate) type LineReader = Lines<Pin<Box<dyn AsyncBufRead + Send>>>;

/// Response format requested through the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Json,
    NdJson,
    Text,
}

impl Accept {
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::NdJson => "application/x-ndjson",
            Self::Text => "text/plain",
        }
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    /// Raw text, e.g. a comma-separated list of IDs.
    Text(String),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
}

impl Body {
    /// A comma-separated ID list, as several endpoints expect.
    pub fn ids<S: AsRef<str>>(ids: &[S]) -> Self {
        Self::Text(join_ids(ids))
    }

    pub fn form(fields: Params) -> Self {
        Self::Form(fields.0)
    }
}

pub(crate) fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| id.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered query parameters. `None` values are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn opt<T: fmt::Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

/// A fully described request, used for streams that are opened later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub params: Params,
    pub body: Body,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }
}

/// Shared HTTP session. The authorization header is fixed at construction.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidAddress(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        if !config.token.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|_| ClientError::Validation("token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Append `path` to the base URL one segment at a time, keeping any
    /// prefix the base carries and percent-encoding each segment.
    fn url(&self, path: &str) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidAddress(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Send a request and fail on any status other than 200.
    pub async fn send(&self, spec: RequestSpec, accept: Accept) -> ClientResult<Response> {
        let url = self.url(&spec.path)?;
        tracing::debug!(method = %spec.method, %url, accept = accept.header_value(), "HTTP request");

        let mut request = self
            .http
            .request(spec.method, url)
            .header(ACCEPT, accept.header_value());
        if !spec.params.is_empty() {
            request = request.query(spec.params.as_slice());
        }
        request = match spec.body {
            Body::Empty => request,
            Body::Text(text) => request.header(CONTENT_TYPE, "text/plain").body(text),
            Body::Form(fields) => request.form(&fields),
        };

        check_status(request.send().await?).await
    }

    pub async fn json<T: DeserializeOwned>(&self, spec: RequestSpec) -> ClientResult<T> {
        let bytes = self.send(spec, Accept::Json).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn text(&self, spec: RequestSpec) -> ClientResult<String> {
        Ok(self.send(spec, Accept::Text).await?.text().await?)
    }

    /// Read a finite NDJSON body. Blank lines are skipped; a malformed line
    /// fails the whole call.
    pub async fn ndjson(&self, spec: RequestSpec) -> ClientResult<Vec<serde_json::Value>> {
        let mut lines = self.lines(spec).await?;
        let mut records = Vec::new();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }

    /// Open a response and read its body line by line as it arrives.
    pub async fn lines(&self, spec: RequestSpec) -> ClientResult<LineReader> {
        let response = self.send(spec, Accept::NdJson).await?;
        Ok(body_lines(response))
    }
}

pub(crate) fn body_lines(response: Response) -> LineReader {
    let body = response.bytes_stream().map_err(std::io::Error::other);
    let reader: Pin<Box<dyn AsyncBufRead + Send>> = Box::pin(StreamReader::new(body));
    reader.lines()
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = api_error(status, &body);
    tracing::debug!(status = status.as_u16(), error = %error, "HTTP request rejected");
    Err(error)
}

/// Build the domain error for a rejected request: the `error` field of a JSON
/// body, else the raw body, else the status reason.
pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| match json.get("error")? {
            serde_json::Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        });

    let message = from_json
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

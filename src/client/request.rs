//! Request primitive
//!
//! Every API call goes through [`ApiClient::request`]: defaults are merged
//! with the caller's options, the shared cookie store is attached, and
//! non-success responses are turned into [`ClientError::Api`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::error::{ClientError, ClientResult, REQUEST_FAILED_MESSAGE};
use super::ApiClient;

/// Request body
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    /// Multipart form; sent without the JSON content-type header
    Multipart(Form),
}

/// Caller-side options for [`ApiClient::request`]
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Body,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn put() -> Self {
        Self::with_method(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    /// Add a header; it overrides the default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> ClientResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

impl ApiClient {
    /// Issue a request to `endpoint` (relative to the API root) and decode
    /// the JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let url = self.url(endpoint);
        let RequestOptions {
            method,
            headers: caller_headers,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        if !matches!(body, Body::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(caller_headers);

        tracing::debug!(method = %method, url = %url, "sending request");

        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.body(serde_json::to_vec(&value)?),
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(method = %method, url = %url, error = %e, "request failed before a response");
            ClientError::Transport(e)
        })?;

        read_json(response).await
    }
}

/// Decode a response, normalizing non-success statuses into errors.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();

    if !status.is_success() {
        // An unreadable body degrades to the fallback message like an unparseable one.
        let body = response.bytes().await.unwrap_or_default();
        let server_message = server_error(&body);
        let from_server = matches!(server_message, Ok(Some(_)));
        let message = error_message(status, server_message);
        tracing::debug!(status = status.as_u16(), message = %message, "request rejected");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
            from_server,
        });
    }

    let body = response.bytes().await.map_err(ClientError::Transport)?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// The `error` string of an error body: `Err` when the body is not JSON,
/// `Ok(None)` when it is JSON without a non-empty `error` string.
pub(crate) fn server_error(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    Ok(value
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string))
}

/// Message for a non-success response.
///
/// Not JSON → `"Request failed"`; JSON with an `error` string → that string;
/// any other JSON → `"HTTP <status>"`.
pub(crate) fn error_message(
    status: StatusCode,
    server_error: Result<Option<String>, serde_json::Error>,
) -> String {
    match server_error {
        Ok(Some(message)) => message,
        Ok(None) => format!("HTTP {}", status.as_u16()),
        Err(_) => REQUEST_FAILED_MESSAGE.to_string(),
    }
}

/// Name and contents of a file to send as a multipart `file` part
pub(crate) async fn read_upload(path: &Path) -> ClientResult<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path).await?;
    Ok((upload_file_name(path), bytes))
}

fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string())
}

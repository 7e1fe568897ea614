//! AI study-tool endpoints
//!
//! Results are passed through untouched; their shape is owned by the
//! backend's AI service.

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::error::ClientResult;
use super::request::{read_upload, RequestOptions};
use super::ApiClient;

/// Body of `POST /ai/compendium`
#[derive(Debug, Clone, Serialize)]
pub struct CompendiumRequest {
    pub content: String,
    /// `understand`, `exam`, `review`...; backend default is `understand`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Body of `POST /ai/ask`
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub content: String,
    pub question: String,
}

/// Body of `POST /ai/explain`
#[derive(Debug, Clone, Serialize)]
pub struct ExplainRequest {
    pub concept: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Body of `POST /ai/flashcards` and `POST /ai/quiz`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// File for `POST /ai/process`
#[derive(Debug, Clone)]
pub struct ProcessUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub goal: Option<String>,
}

impl ProcessUpload {
    pub async fn from_path(path: &Path, goal: Option<String>) -> ClientResult<Self> {
        let (file_name, bytes) = read_upload(path).await?;
        Ok(Self {
            file_name,
            bytes,
            goal,
        })
    }

    fn into_form(self) -> Form {
        let form = Form::new().part("file", Part::bytes(self.bytes).file_name(self.file_name));
        match self.goal {
            Some(goal) => form.text("goal", goal),
            None => form,
        }
    }
}

/// `/ai/*` operations
pub struct Ai<'a> {
    client: &'a ApiClient,
}

impl<'a> Ai<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Extract a file's text and build a compendium from it.
    pub async fn process(&self, upload: ProcessUpload) -> ClientResult<Value> {
        tracing::info!(file = %upload.file_name, "sending file for AI processing");
        self.client
            .request("/ai/process", RequestOptions::post().multipart(upload.into_form()))
            .await
    }

    pub async fn compendium(&self, request: &CompendiumRequest) -> ClientResult<Value> {
        self.client
            .request("/ai/compendium", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn ask(&self, request: &AskRequest) -> ClientResult<Value> {
        self.client
            .request("/ai/ask", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn explain(&self, request: &ExplainRequest) -> ClientResult<Value> {
        self.client
            .request("/ai/explain", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn flashcards(&self, request: &GenerateRequest) -> ClientResult<Value> {
        self.client
            .request("/ai/flashcards", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn quiz(&self, request: &GenerateRequest) -> ClientResult<Value> {
        self.client
            .request("/ai/quiz", RequestOptions::post().json(request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_flashcards_omits_missing_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/flashcards"))
            .and(body_json(json!({"content": "Mitochondria make ATP."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "flashcards": [{"front": "What makes ATP?", "back": "Mitochondria"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri())).unwrap();
        let result = client
            .ai()
            .flashcards(&GenerateRequest {
                content: "Mitochondria make ATP.".into(),
                count: None,
            })
            .await
            .unwrap();
        assert_eq!(result["flashcards"][0]["back"], "Mitochondria");
    }

    #[tokio::test]
    async fn test_process_sends_goal_as_form_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai/process"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("name=\"goal\""))
            .and(body_string_contains("exam"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri())).unwrap();
        let upload = ProcessUpload {
            file_name: "lecture.pdf".into(),
            bytes: b"%PDF".to_vec(),
            goal: Some("exam".into()),
        };
        let result = client.ai().process(upload).await.unwrap();
        assert_eq!(result["success"], true);
    }
}

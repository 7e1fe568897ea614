//! Study material endpoints

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::error::ClientResult;
use super::query::{QueryParams, ToQuery};
use super::request::{read_upload, RequestOptions};
use super::ApiClient;

/// Filter for `GET /materials`
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    /// `new`, `processing`, `in-progress`, `completed`
    pub status: Option<String>,
    /// `pdf`, `doc`, `ppt`, `img`; sent as `type`
    pub file_type: Option<String>,
    pub limit: Option<u32>,
}

impl ToQuery for MaterialFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("status", self.status.as_deref())
            .push("type", self.file_type.as_deref())
            .push("limit", self.limit)
    }
}

/// Partial update for `PUT /materials/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Comma-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// File plus metadata for `POST /materials`
#[derive(Debug, Clone)]
pub struct MaterialUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub tags: Option<String>,
}

impl MaterialUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            name: None,
            subject: None,
            tags: None,
        }
    }

    /// Read the file at `path`; the upload keeps its file name.
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let (file_name, bytes) = read_upload(path).await?;
        Ok(Self::new(file_name, bytes))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    fn into_form(self) -> Form {
        let mut form = Form::new().part("file", Part::bytes(self.bytes).file_name(self.file_name));
        for (key, value) in [("name", self.name), ("subject", self.subject), ("tags", self.tags)] {
            if let Some(value) = value {
                form = form.text(key, value);
            }
        }
        form
    }
}

/// `/materials` operations
pub struct Materials<'a> {
    client: &'a ApiClient,
}

impl<'a> Materials<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: &MaterialFilter) -> ClientResult<Value> {
        let endpoint = filter.to_query().apply("/materials");
        self.client.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/materials/{id}"), RequestOptions::get())
            .await
    }

    /// Upload a file as multipart form data.
    pub async fn upload(&self, upload: MaterialUpload) -> ClientResult<Value> {
        tracing::info!(file = %upload.file_name, size = upload.bytes.len(), "uploading material");
        self.client
            .request("/materials", RequestOptions::post().multipart(upload.into_form()))
            .await
    }

    pub async fn update(&self, id: i64, update: &MaterialUpdate) -> ClientResult<Value> {
        self.client
            .request(&format!("/materials/{id}"), RequestOptions::put().json(update)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/materials/{id}"), RequestOptions::delete())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, ClientError};
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_filter_only_includes_present_keys() {
        let filter = MaterialFilter {
            status: None,
            file_type: Some("pdf".into()),
            limit: Some(5),
        };
        let params = filter.to_query();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["type", "limit"]);
        assert_eq!(params.apply("/materials"), "/materials?type=pdf&limit=5");

        assert_eq!(MaterialFilter::default().to_query().apply("/materials"), "/materials");
    }

    #[tokio::test]
    async fn test_get_all_passes_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/materials"))
            .and(query_param("status", "new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Chapter 1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri())).unwrap();
        let filter = MaterialFilter {
            status: Some("new".into()),
            ..Default::default()
        };
        let materials = client.materials().get_all(&filter).await.unwrap();
        assert_eq!(materials[0]["name"], "Chapter 1");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("status=new"));
    }

    #[tokio::test]
    async fn test_upload_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/materials"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("notes.pdf"))
            .and(body_string_contains("Biology"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "status": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let upload = MaterialUpload::from_path(file.path())
            .await
            .unwrap()
            .subject("Biology");
        let upload = MaterialUpload {
            file_name: "notes.pdf".into(),
            ..upload
        };

        let client = ApiClient::new(ClientConfig::new(&server.uri())).unwrap();
        let material = client.materials().upload(upload).await.unwrap();
        assert_eq!(material["id"], 9);
    }

    #[tokio::test]
    async fn test_upload_rejection_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/materials"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "File type not allowed"})))
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri())).unwrap();
        let err = client
            .materials()
            .upload(MaterialUpload::new("virus.exe", vec![0, 1, 2]))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert_eq!(err.to_string(), "File type not allowed");
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_io_error() {
        let err = MaterialUpload::from_path(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}

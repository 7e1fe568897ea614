//! Study session endpoints

use serde::Serialize;
use serde_json::Value;

use super::error::ClientResult;
use super::query::{QueryParams, ToQuery};
use super::request::RequestOptions;
use super::ApiClient;

/// Filter for `GET /sessions`
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Look-back window; the backend defaults to 7
    pub days: Option<u32>,
}

impl ToQuery for SessionFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new().push("days", self.days)
    }
}

/// Body of `POST /sessions`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<i64>,
    /// `reading`, `quiz`, `flashcards`, `review`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
}

/// Body of `POST /sessions/{id}/end`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnd {
    /// Minutes
    pub duration: u32,
    pub pages_covered: u32,
}

/// `/sessions` operations
pub struct Sessions<'a> {
    client: &'a ApiClient,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: &SessionFilter) -> ClientResult<Value> {
        let endpoint = filter.to_query().apply("/sessions");
        self.client.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn start(&self, session: &NewSession) -> ClientResult<Value> {
        self.client
            .request("/sessions", RequestOptions::post().json(session)?)
            .await
    }

    pub async fn end(&self, id: i64, end: &SessionEnd) -> ClientResult<Value> {
        self.client
            .request(&format!("/sessions/{id}/end"), RequestOptions::post().json(end)?)
            .await
    }
}

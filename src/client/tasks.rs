//! Task endpoints

use serde::Serialize;
use serde_json::Value;

use super::error::ClientResult;
use super::query::{QueryParams, ToQuery};
use super::request::RequestOptions;
use super::ApiClient;

/// Filter for `GET /tasks`
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub limit: Option<u32>,
}

impl ToQuery for TaskFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("completed", self.completed)
            .push("limit", self.limit)
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// ISO 8601 date or datetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// `low`, `medium`, `high`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<i64>,
}

/// Partial update for `PUT /tasks/{id}`.
///
/// The backend reads these keys in snake_case, except `dueDate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// `/tasks` operations
pub struct Tasks<'a> {
    client: &'a ApiClient,
}

impl<'a> Tasks<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: &TaskFilter) -> ClientResult<Value> {
        let endpoint = filter.to_query().apply("/tasks");
        self.client.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/tasks/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create(&self, task: &NewTask) -> ClientResult<Value> {
        self.client
            .request("/tasks", RequestOptions::post().json(task)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &TaskUpdate) -> ClientResult<Value> {
        self.client
            .request(&format!("/tasks/{id}"), RequestOptions::put().json(update)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/tasks/{id}"), RequestOptions::delete())
            .await
    }

    /// Flip the completion flag.
    pub async fn toggle(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/tasks/{id}/toggle"), RequestOptions::post())
            .await
    }
}

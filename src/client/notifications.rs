//! Notification endpoints

use serde_json::Value;

use super::error::ClientResult;
use super::models::NotificationList;
use super::query::{QueryParams, ToQuery};
use super::request::RequestOptions;
use super::ApiClient;

/// Filter for `GET /notifications`
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub limit: Option<u32>,
    /// Only unread notifications
    pub unread: Option<bool>,
}

impl ToQuery for NotificationFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("limit", self.limit)
            .push("unread", self.unread)
    }
}

/// `/notifications` operations
pub struct Notifications<'a> {
    client: &'a ApiClient,
}

impl<'a> Notifications<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, filter: &NotificationFilter) -> ClientResult<NotificationList> {
        let endpoint = filter.to_query().apply("/notifications");
        self.client.request(&endpoint, RequestOptions::get()).await
    }

    pub async fn mark_read(&self, id: i64) -> ClientResult<Value> {
        self.client
            .request(&format!("/notifications/{id}/read"), RequestOptions::post())
            .await
    }

    pub async fn mark_all_read(&self) -> ClientResult<Value> {
        self.client
            .request("/notifications/read-all", RequestOptions::post())
            .await
    }
}

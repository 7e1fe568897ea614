//! Progress endpoints

use serde_json::Value;

use super::error::ClientResult;
use super::query::{QueryParams, ToQuery};
use super::request::RequestOptions;
use super::ApiClient;

/// Filter for `GET /progress/daily`
#[derive(Debug, Clone, Default)]
pub struct ProgressFilter {
    pub days: Option<u32>,
}

impl ToQuery for ProgressFilter {
    fn to_query(&self) -> QueryParams {
        QueryParams::new().push("days", self.days)
    }
}

/// `/progress` operations
pub struct Progress<'a> {
    client: &'a ApiClient,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One record per day in the window, oldest first.
    pub async fn daily(&self, filter: &ProgressFilter) -> ClientResult<Value> {
        let endpoint = filter.to_query().apply("/progress/daily");
        self.client.request(&endpoint, RequestOptions::get()).await
    }

    /// Totals for the current week plus the daily breakdown.
    pub async fn weekly(&self) -> ClientResult<Value> {
        self.client
            .request("/progress/weekly", RequestOptions::get())
            .await
    }
}

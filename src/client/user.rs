//! User stats and settings endpoints

use serde::Serialize;
use serde_json::Value;

use super::error::ClientResult;
use super::models::UserStats;
use super::request::RequestOptions;
use super::ApiClient;

/// Partial settings update; only present fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    /// Minutes per day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<u32>,
    /// Minutes per week
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_goal: Option<u32>,
    /// `HH:MM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
}

/// `/user/*` operations
pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ClientResult<UserStats> {
        self.client
            .request("/user/stats", RequestOptions::get())
            .await
    }

    pub async fn settings(&self) -> ClientResult<Value> {
        self.client
            .request("/user/settings", RequestOptions::get())
            .await
    }

    pub async fn update_settings(&self, update: &SettingsUpdate) -> ClientResult<Value> {
        self.client
            .request("/user/settings", RequestOptions::put().json(update)?)
            .await
    }
}

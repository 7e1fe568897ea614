//! Response types shared across resource groups
//!
//! Only the user record and the small envelopes the handlers rely on are
//! typed. Materials, tasks, sessions and the rest travel as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed-in user as returned by the backend.
///
/// Fields the client does not use are kept in `extra` so the record can be
/// cached and written back without losing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_initials: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name shown in the dashboard header.
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string(),
        }
    }

    /// Avatar text: server-provided initials, else the first letter of each name.
    pub fn initials(&self) -> String {
        if let Some(initials) = self.avatar_initials.as_deref() {
            if !initials.trim().is_empty() {
                return initials.trim().to_string();
            }
        }
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Body of `/auth/login` and `/auth/register` responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `/auth/me`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub success: bool,
    pub user: User,
}

/// Body of `/auth/check`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthCheck {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// One dashboard stat card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub label: String,
}

impl StatCard {
    /// Value with its unit, e.g. `4.5h` or `3/7`.
    pub fn display_value(&self) -> String {
        let value = match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => "-".to_string(),
            other => other.to_string(),
        };
        format!("{}{}", value, self.unit.as_deref().unwrap_or(""))
    }
}

/// Body of `/user/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "studyTime")]
    pub study_time: StatCard,
    pub materials: StatCard,
    pub tasks: StatCard,
    pub streak: StatCard,
}

impl UserStats {
    pub fn cards(&self) -> [&StatCard; 4] {
        [&self.study_time, &self.materials, &self.tasks, &self.streak]
    }
}

/// Body of `/notifications`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationList {
    #[serde(default)]
    pub notifications: Vec<Value>,
    #[serde(default)]
    pub unread_count: u64,
}

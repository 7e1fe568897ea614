//! StudyMind REST API Client
//!
//! One method per backend operation, grouped by resource area:
//!
//! - [`Auth`]: register, login, logout, current user, session check
//! - [`UserApi`]: dashboard stats and settings
//! - [`Materials`], [`Tasks`], [`Sessions`], [`Notifications`], [`Progress`]
//! - [`Ai`]: study tools (compendium, Q&A, flashcards, quizzes)
//!
//! All of them go through [`ApiClient::request`]. Requests carry the shared
//! cookie store, so a session established by `login` is sent on every call
//! that follows.

mod ai;
mod auth;
mod error;
mod materials;
mod models;
mod notifications;
mod progress;
mod query;
mod request;
mod sessions;
mod tasks;
mod user;

pub use ai::{Ai, AskRequest, CompendiumRequest, ExplainRequest, GenerateRequest, ProcessUpload};
pub use auth::{Auth, LoginRequest, RegisterRequest};
pub use error::{ClientError, ClientResult, CONNECT_FAILED_MESSAGE, REQUEST_FAILED_MESSAGE};
pub use materials::{MaterialFilter, MaterialUpdate, MaterialUpload, Materials};
pub use models::{
    AuthCheck, AuthResponse, CurrentUser, NotificationList, StatCard, User, UserStats,
};
pub use notifications::{NotificationFilter, Notifications};
pub use progress::{Progress, ProgressFilter};
pub use query::{QueryParams, ToQuery};
pub use request::{Body, RequestOptions};
pub use sessions::{NewSession, SessionEnd, SessionFilter, Sessions};
pub use tasks::{NewTask, TaskFilter, TaskUpdate, Tasks};
pub use user::{SettingsUpdate, UserApi};

use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use std::sync::{Arc, PoisonError, RwLock};

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Fixed path segment every endpoint lives under
pub const API_PREFIX: &str = "/api";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        let mut config = Self {
            base_url: String::new(),
            user_agent: None,
        };
        config.configure(base_url);
        config
    }

    /// Point the configuration at a new backend.
    pub fn configure(&mut self, base_url: &str) {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    /// Backend address without the API prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root every endpoint is resolved against, e.g. `https://x.com/api`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url, API_PREFIX)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// StudyMind API client.
///
/// Cloning is cheap; clones share the HTTP connection pool, the cookie store
/// and the configuration, so [`configure`](Self::configure) on one clone is
/// seen by all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
    cookies: Arc<Jar>,
}

impl ApiClient {
    /// Create a client with an empty cookie store
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::with_cookies(config, Arc::new(Jar::default()))
    }

    /// Create a client around an existing cookie store
    pub fn with_cookies(config: ClientConfig, cookies: Arc<Jar>) -> ClientResult<Self> {
        let mut builder = Client::builder().cookie_provider(Arc::clone(&cookies));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build().map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(config)),
            cookies,
        })
    }

    /// Rewrite the backend address used by every subsequent call.
    pub fn configure(&self, base_url: &str) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.configure(base_url);
        tracing::info!(api_root = %config.api_root(), "API client configured");
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> ClientConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn api_root(&self) -> String {
        self.config().api_root()
    }

    /// Absolute URL for an endpoint path such as `/tasks/3`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_root(), endpoint)
    }

    /// Cookie store shared by every request
    pub fn cookies(&self) -> &Arc<Jar> {
        &self.cookies
    }

    /// URL that persisted session cookies are scoped to.
    pub fn cookie_url(&self) -> Option<Url> {
        Url::parse(&self.url("/")).ok()
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn materials(&self) -> Materials<'_> {
        Materials::new(self)
    }

    pub fn tasks(&self) -> Tasks<'_> {
        Tasks::new(self)
    }

    pub fn sessions(&self) -> Sessions<'_> {
        Sessions::new(self)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    pub fn progress(&self) -> Progress<'_> {
        Progress::new(self)
    }

    pub fn ai(&self) -> Ai<'_> {
        Ai::new(self)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.api_root(), "http://localhost:5000/api");
    }

    #[test]
    fn test_configure_trims_trailing_slash() {
        let config = ClientConfig::new("https://x.com/");
        assert_eq!(config.api_root(), "https://x.com/api");

        let config = ClientConfig::new("https://x.com//");
        assert_eq!(config.api_root(), "https://x.com/api");
    }

    #[test]
    fn test_configure_applies_to_clones() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let clone = client.clone();

        client.configure("https://x.com/");

        assert_eq!(clone.url("/tasks"), "https://x.com/api/tasks");
        assert!(!clone.url("/tasks").contains("//api"));
    }
}

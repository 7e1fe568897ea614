//! # StudyMind
//!
//! Client-side layer for the StudyMind learning platform: a typed wrapper
//! around the StudyMind REST API plus the login, registration and dashboard
//! flows that sit on top of it.
//!
//! ## Modules
//!
//! - [`client`]: API client, one method per backend operation
//! - [`handlers`]: form and dashboard flows, driven through a [`handlers::Page`]
//! - [`storage`]: client-side key/value storage for the signed-in user
//! - [`terminal`]: a `Page` that renders to the terminal (used by the CLI)
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use studymind::client::{ApiClient, ClientConfig, TaskFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("http://localhost:5000"))?;
//!
//!     let auth = client.auth().login("ada@example.com", "secret1", false).await?;
//!     println!("signed in: {}", auth.success);
//!
//!     let open = client
//!         .tasks()
//!         .get_all(&TaskFilter { completed: Some(false), limit: Some(10) })
//!         .await?;
//!     println!("{open}");
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod handlers;
pub mod storage;
pub mod terminal;

pub use client::{ApiClient, ClientConfig, ClientError, ClientResult, User, UserStats};

pub use config::{
    ApiConfig, Config, ConfigError, ConfigLoad, LoggingConfig, StorageConfig, UiConfig,
};

pub use handlers::{
    Banner, BannerBoard, BannerKind, DashboardState, Destination, FormOutcome, LoginForm, Page,
    PageController, RegistrationForm, SubmitControl, Timings, ValidationError,
};

pub use storage::{
    FileStorage, LocalStorage, MemoryStorage, SessionCookies, StorageError, StorageResult,
    USER_KEY,
};

pub use terminal::TerminalPage;

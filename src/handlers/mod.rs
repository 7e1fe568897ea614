//! Form and dashboard flows
//!
//! The flows here own no presentation. They read form values handed to them,
//! call the API through [`ApiClient`], keep the signed-in user in a
//! [`LocalStorage`] and report everything visible through a [`Page`]:
//!
//! - [`PageController::submit_login`] / [`PageController::submit_registration`]
//! - [`PageController::logout`]
//! - [`PageController::load_dashboard`]
//! - [`PageController::refresh_session`]

mod banner;
mod dashboard;
mod forms;
mod validation;

pub use banner::{Banner, BannerBoard, BannerKind, ERROR_BANNER_TTL};
pub use dashboard::DashboardState;
pub use forms::{
    FormOutcome, LOGIN_BUSY_LABEL, LOGIN_FAILED_MESSAGE, LOGIN_LABEL, LOGIN_SUCCESS_MESSAGE,
    REGISTER_BUSY_LABEL, REGISTER_FAILED_MESSAGE, REGISTER_LABEL, REGISTER_SUCCESS_MESSAGE,
};
pub use validation::{
    looks_like_email, validate_login, validate_registration, LoginForm, RegistrationForm,
    ValidationError, MIN_PASSWORD_LEN,
};

use std::time::Duration;

use crate::client::{ApiClient, UserStats};
use crate::config::UiConfig;
use crate::storage::LocalStorage;

/// Delay between a successful sign-in and the dashboard redirect
pub const REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// Where a flow sends the user next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Login / registration entry page
    Entry,
    Dashboard,
}

impl Destination {
    /// Page path in the web frontend
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Entry => "index.html",
            Destination::Dashboard => "dashboard.html",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// State of a form's submit control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitControl {
    /// Disabled, showing a progress label
    Busy(String),
    /// Enabled, showing its normal label
    Ready(String),
}

/// Presentation binding the flows render through
pub trait Page {
    /// Draw the visible banner, or remove it when `None`.
    fn render_banner(&mut self, banner: Option<&Banner>);

    fn set_submit(&mut self, control: SubmitControl);

    /// Go to `destination` once `delay` has passed.
    fn navigate(&mut self, destination: Destination, delay: Duration);

    fn render_user(&mut self, name: &str, initials: &str);

    fn render_stats(&mut self, stats: &UserStats);
}

/// Delays used by the flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub redirect_delay: Duration,
    pub error_banner_ttl: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            redirect_delay: REDIRECT_DELAY,
            error_banner_ttl: ERROR_BANNER_TTL,
        }
    }
}

impl From<&UiConfig> for Timings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            redirect_delay: Duration::from_millis(ui.redirect_delay_ms),
            error_banner_ttl: Duration::from_millis(ui.error_banner_ms),
        }
    }
}

/// Runs the flows of one page against a client, a page binding and storage.
///
/// The banner board is the only state kept between calls.
#[derive(Debug)]
pub struct PageController<P, S> {
    client: ApiClient,
    page: P,
    storage: S,
    banners: BannerBoard,
    timings: Timings,
}

impl<P: Page, S: LocalStorage> PageController<P, S> {
    pub fn new(client: ApiClient, page: P, storage: S) -> Self {
        Self::with_timings(client, page, storage, Timings::default())
    }

    pub fn with_timings(client: ApiClient, page: P, storage: S, timings: Timings) -> Self {
        Self {
            client,
            page,
            storage,
            banners: BannerBoard::new(timings.error_banner_ttl),
            timings,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn banners(&self) -> &BannerBoard {
        &self.banners
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Hand back the page binding and storage.
    pub fn into_parts(self) -> (P, S) {
        (self.page, self.storage)
    }

    /// Replace the visible banner with an error.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show(Banner::error(message));
    }

    /// Replace the visible banner with a success message.
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.show(Banner::success(message));
    }

    fn show(&mut self, banner: Banner) {
        self.banners.show(banner);
        self.page.render_banner(self.banners.current());
    }

    /// Remove an error banner whose time is up. Returns true when one was removed.
    pub fn expire_banners(&mut self) -> bool {
        let expired = self.banners.prune();
        if expired {
            self.page.render_banner(None);
        }
        expired
    }

    /// Sleep until the visible error banner expires, then remove it from the
    /// page. Returns false straight away when no banner is due to expire.
    pub async fn wait_banner_expiry(&mut self) -> bool {
        let Some(expires_at) = self.banners.expires_at() else {
            return false;
        };
        tokio::time::sleep_until(expires_at).await;
        self.expire_banners()
    }
}

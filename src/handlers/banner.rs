//! Status banners
//!
//! At most one banner is visible. Showing a new banner replaces the current
//! one whatever its kind. Error banners expire on their own; success banners
//! stay until replaced.

use std::time::Duration;
use tokio::time::Instant;

/// Default lifetime of an error banner
pub const ERROR_BANNER_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }
}

/// Holder of the single visible banner
#[derive(Debug, Clone)]
pub struct BannerBoard {
    current: Option<(Banner, Option<Instant>)>,
    error_ttl: Duration,
}

impl Default for BannerBoard {
    fn default() -> Self {
        Self::new(ERROR_BANNER_TTL)
    }
}

impl BannerBoard {
    pub fn new(error_ttl: Duration) -> Self {
        Self {
            current: None,
            error_ttl,
        }
    }

    /// Replace whatever is showing with `banner`.
    pub fn show(&mut self, banner: Banner) {
        let expires_at = banner.is_error().then(|| Instant::now() + self.error_ttl);
        self.current = Some((banner, expires_at));
    }

    /// Visible banner, ignoring one that has already expired.
    pub fn current(&self) -> Option<&Banner> {
        let (banner, expires_at) = self.current.as_ref()?;
        match expires_at {
            Some(expires_at) if Instant::now() >= *expires_at => None,
            _ => Some(banner),
        }
    }

    /// Drop an expired banner. Returns true when something was removed.
    pub fn prune(&mut self) -> bool {
        let expired = matches!(
            &self.current,
            Some((_, Some(expires_at))) if Instant::now() >= *expires_at
        );
        if expired {
            self.current = None;
        }
        expired
    }

    /// When the visible banner will expire on its own.
    pub fn expires_at(&self) -> Option<Instant> {
        self.current.as_ref().and_then(|(_, expires_at)| *expires_at)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Number of visible banners: zero or one.
    pub fn visible_count(&self) -> usize {
        usize::from(self.current().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_errors_leave_one_banner() {
        let mut board = BannerBoard::default();
        board.show(Banner::error("first"));
        board.show(Banner::error("second"));

        assert_eq!(board.visible_count(), 1);
        assert_eq!(board.current().unwrap().message, "second");
    }

    #[test]
    fn test_new_banner_replaces_other_kind() {
        let mut board = BannerBoard::default();
        board.show(Banner::success("saved"));
        board.show(Banner::error("oops"));
        assert_eq!(board.current(), Some(&Banner::error("oops")));

        board.show(Banner::success("fixed"));
        assert_eq!(board.current(), Some(&Banner::success("fixed")));
        assert_eq!(board.visible_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_banner_expires() {
        let mut board = BannerBoard::default();
        board.show(Banner::error("Please enter a password"));

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(board.current().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(board.current().is_none());
        assert!(board.prune());
        assert!(!board.prune());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_banner_persists() {
        let mut board = BannerBoard::default();
        board.show(Banner::success("Login successful! Redirecting..."));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!board.prune());
        assert!(board.current().is_some());
        assert!(board.expires_at().is_none());
    }
}

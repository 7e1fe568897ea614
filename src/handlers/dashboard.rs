//! Dashboard load

use super::{Destination, Page, PageController};
use crate::client::{User, UserStats};
use crate::storage::LocalStorage;

/// What the dashboard ended up showing
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    /// No cached user; the entry page redirect is scheduled
    SignedOut,
    /// `stats` is `None` when the stats request failed
    Loaded {
        user: User,
        stats: Option<UserStats>,
    },
}

impl<P: Page, S: LocalStorage> PageController<P, S> {
    /// Render the cached user and their stats, or send a signed-out visitor
    /// back to the entry page without touching the network.
    pub async fn load_dashboard(&mut self) -> DashboardState {
        let user = match self.storage.load_user() {
            Ok(Some(user)) => user,
            Ok(None) => return self.signed_out(),
            Err(e) => {
                tracing::warn!(error = %e, "cached user is unreadable");
                return self.signed_out();
            }
        };

        self.page.render_user(&user.display_name(), &user.initials());

        let stats = match self.client.user().stats().await {
            Ok(stats) => {
                self.page.render_stats(&stats);
                Some(stats)
            }
            Err(e) => {
                tracing::debug!(error = %e, "dashboard stats unavailable");
                None
            }
        };

        DashboardState::Loaded { user, stats }
    }

    fn signed_out(&mut self) -> DashboardState {
        self.page
            .navigate(Destination::Entry, std::time::Duration::ZERO);
        DashboardState::SignedOut
    }
}

//! Terminal page binding
//!
//! [`TerminalPage`] renders banners, the signed-in user and the stat cards
//! as plain lines. Navigation is recorded rather than performed; the CLI
//! reads it back with [`TerminalPage::pending_navigation`].

use std::io::{Stdout, Write};
use std::time::Duration;

use crate::client::{StatCard, UserStats};
use crate::handlers::{Banner, BannerKind, Destination, Page, SubmitControl};

/// A [`Page`] that writes to a terminal (or any writer)
#[derive(Debug)]
pub struct TerminalPage<W = Stdout> {
    out: W,
    pending: Option<(Destination, Duration)>,
    submit: Option<SubmitControl>,
}

impl TerminalPage<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalPage<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: None,
            submit: None,
        }
    }

    /// Last navigation a flow asked for
    pub fn pending_navigation(&self) -> Option<(Destination, Duration)> {
        self.pending
    }

    /// Current state of the submit control
    pub fn submit_state(&self) -> Option<&SubmitControl> {
        self.submit.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

fn card_detail(card: &StatCard) -> String {
    match (card.change, card.percentage) {
        (_, Some(percentage)) => format!("{percentage}%"),
        (Some(change), None) if change >= 0.0 => format!("+{change}"),
        (Some(change), None) => change.to_string(),
        (None, None) => String::new(),
    }
}

impl<W: Write> Page for TerminalPage<W> {
    fn render_banner(&mut self, banner: Option<&Banner>) {
        let Some(banner) = banner else {
            return;
        };
        let text = match banner.kind {
            BannerKind::Error => format!("Error: {}", banner.message),
            BannerKind::Success => banner.message.clone(),
        };
        self.line(&text);
    }

    fn set_submit(&mut self, control: SubmitControl) {
        if let SubmitControl::Busy(label) = &control {
            self.line(label);
        }
        self.submit = Some(control);
    }

    fn navigate(&mut self, destination: Destination, delay: Duration) {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(%destination, delay_ms, "navigation scheduled");
        self.pending = Some((destination, delay));
    }

    fn render_user(&mut self, name: &str, initials: &str) {
        self.line(&format!("[{}] {}", initials, name));
    }

    fn render_stats(&mut self, stats: &UserStats) {
        self.line("");
        for card in stats.cards() {
            let row = format!(
                "{:<24} {:>8} {}",
                card.label,
                card.display_value(),
                card_detail(card)
            );
            self.line(row.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(page: TerminalPage<Vec<u8>>) -> String {
        String::from_utf8(page.into_inner()).unwrap()
    }

    #[test]
    fn test_banners_and_busy_label() {
        let mut page = TerminalPage::new(Vec::new());
        page.set_submit(SubmitControl::Busy("Signing in...".into()));
        page.render_banner(Some(&Banner::error("Passwords do not match")));
        page.render_banner(None);
        page.set_submit(SubmitControl::Ready("Sign In".into()));

        assert_eq!(
            page.submit_state(),
            Some(&SubmitControl::Ready("Sign In".into()))
        );
        assert_eq!(
            output(page),
            "Signing in...\nError: Passwords do not match\n"
        );
    }

    #[test]
    fn test_navigation_is_recorded() {
        let mut page = TerminalPage::new(Vec::new());
        assert_eq!(page.pending_navigation(), None);

        page.navigate(Destination::Dashboard, Duration::from_millis(500));
        assert_eq!(
            page.pending_navigation(),
            Some((Destination::Dashboard, Duration::from_millis(500)))
        );
        assert!(output(page).is_empty());
    }

    #[test]
    fn test_navigation_keeps_long_delay() {
        let mut page = TerminalPage::new(Vec::new());
        page.navigate(Destination::Entry, Duration::MAX);
        assert_eq!(
            page.pending_navigation(),
            Some((Destination::Entry, Duration::MAX))
        );
    }

    #[test]
    fn test_stats_rows() {
        let stats: UserStats = serde_json::from_value(json!({
            "studyTime": {"value": 4.5, "unit": "h", "change": 12, "label": "Study Time This Week"},
            "materials": {"value": 3, "change": 1, "label": "Materials Processed"},
            "tasks": {"value": "2/5", "percentage": 40, "label": "Tasks Completed"},
            "streak": {"value": 4, "label": "Day Streak"}
        }))
        .unwrap();

        let mut page = TerminalPage::new(Vec::new());
        page.render_user("Ada Lovelace", "AL");
        page.render_stats(&stats);

        let text = output(page);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[AL] Ada Lovelace");
        assert!(lines[2].starts_with("Study Time This Week"));
        assert!(lines[2].contains("4.5h"));
        assert!(lines[2].ends_with("+12"));
        assert!(lines[4].ends_with("40%"));
        assert!(lines[5].ends_with('4'));
    }
}

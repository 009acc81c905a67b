//! Transient toast notifications.
//!
//! The console's analogue of a browser toast: short-lived messages stacked
//! in the top-right corner, pruned on tick once their time-to-live expires.

use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::theme::Theme;
use crate::tui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-facing message, independent of when it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

struct Notification {
    notice: Notice,
    created_at: Instant,
    ttl: Duration,
}

/// Active notifications, newest last.
#[derive(Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notice: Notice) {
        // Errors linger a little longer so they can actually be read.
        let ttl = match notice.level {
            NoticeLevel::Error => Duration::from_secs(5),
            _ => Duration::from_millis(2500),
        };
        self.items.push(Notification {
            notice,
            created_at: Instant::now(),
            ttl,
        });
    }

    /// Drop expired notifications. Called on every tick.
    pub fn prune(&mut self) {
        self.items.retain(|n| n.created_at.elapsed() < n.ttl);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draw the stack into the top-right corner of `area`.
    pub fn draw(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        for (i, notification) in self.items.iter().rev().take(5).enumerate() {
            let text = format!(" {} ", notification.notice.text);
            let width = (text.chars().count() as u16).min(area.width);
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let rect = Rect {
                x: area.x + area.width.saturating_sub(width),
                y,
                width,
                height: 1,
            };
            let style = match notification.notice.level {
                NoticeLevel::Info => Style::default().fg(theme.info_fg).bg(theme.chip_bg),
                NoticeLevel::Success => Style::default().fg(theme.success_fg).bg(theme.chip_bg),
                NoticeLevel::Error => Style::default().fg(theme.danger_fg).bg(theme.chip_bg),
            };
            f.render_widget(Clear, rect);
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(text, style))),
                rect,
            );
        }
    }
}

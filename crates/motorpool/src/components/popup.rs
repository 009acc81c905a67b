//! Shared popup rendering helpers.
//!
//! Usage:
//! 1) draw the active page as usual
//! 2) call [`render_backdrop`] over the page area
//! 3) compute a dialog rect with [`centered_rect_fixed`]
//! 4) call [`draw_popup_frame`] and draw the popup content inside it

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, Clear},
};

use crate::theme::Theme;
use crate::tui::Frame;

/// Dim the page under a modal popup. Terminals have no real transparency;
/// a solid dark backdrop reads the same way.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    let backdrop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(backdrop, area);
}

/// A centered rectangle of at most `width` × `height`, clamped to `area`.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    let x = area.x.saturating_add((area.width.saturating_sub(w)) / 2);
    let y = area.y.saturating_add((area.height.saturating_sub(h)) / 2);

    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Clear `area` and draw a rounded, titled dialog frame over it. Returns the
/// inner rect content should be drawn into.
pub fn draw_popup_frame(
    frame: &mut Frame<'_>,
    area: Rect,
    title: impl Into<String>,
    theme: &Theme,
) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(theme.border_style());

    frame.render_widget(block, area);

    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

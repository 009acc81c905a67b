use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::popup::{centered_rect_fixed, draw_popup_frame},
    components::Component,
    theme::Theme,
    tui::{EventResponse, Frame},
};

/// Modal message dialog with a single dismiss action. Used for failures
/// that need more room than a toast.
pub struct AlertPopup {
    title: String,
    message: String,
    min_width: u16,
    min_height: u16,
    theme: Theme,
}

impl AlertPopup {
    pub fn new<T: Into<String>, M: Into<String>>(title: T, message: M, theme: Theme) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            min_width: 56,
            min_height: 9,
            theme,
        }
    }
}

impl Component for AlertPopup {
    fn popup_min_size(&self) -> Option<(u16, u16)> {
        Some((self.min_width, self.min_height))
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(Action::ClosePopup),
            _ => None,
        };
        Ok(action.map(EventResponse::Stop))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: ratatui::layout::Rect) -> Result<()> {
        if area.width < 5 || area.height < 5 {
            return Ok(());
        }

        let w = self.min_width.min(area.width);
        let h = self.min_height.min(area.height);
        let dialog = centered_rect_fixed(area, w, h);
        let inner = draw_popup_frame(f, dialog, &self.title, &self.theme);

        let mut lines: Vec<Line> = Vec::new();
        for l in self.message.lines() {
            lines.push(Line::from(Span::styled(l, self.theme.error_style())));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Enter/Esc: Dismiss",
            self.theme.hint_style(),
        )));

        f.render_widget(
            Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
            inner,
        );
        Ok(())
    }
}

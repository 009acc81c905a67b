use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::{Action, PopupResult},
    components::popup::{centered_rect_fixed, draw_popup_frame},
    components::Component,
    theme::Theme,
    tui::{EventResponse, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Ok,
    Cancel,
}

/// Modal confirmation dialog with selectable OK/Cancel buttons.
///
/// - Left/Right or Tab/BackTab switch the selected button
/// - Enter submits and emits `Action::PopupResult`
/// - Esc cancels
///
/// The application maps the emitted result to whatever it was asking about
/// (e.g. a pending soft delete) and closes the popup.
pub struct ConfirmPopup {
    title: String,
    question: String,
    ok_label: String,
    cancel_label: String,
    selected: Choice,
    min_width: u16,
    min_height: u16,
    theme: Theme,
}

impl ConfirmPopup {
    pub fn new<T: Into<String>, Q: Into<String>>(title: T, question: Q, theme: Theme) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
            ok_label: "OK".into(),
            cancel_label: "Cancel".into(),
            selected: Choice::Ok,
            min_width: 50,
            min_height: 8,
            theme,
        }
    }

    pub fn ok_label<S: Into<String>>(mut self, label: S) -> Self {
        self.ok_label = label.into();
        self
    }

    pub fn cancel_label<S: Into<String>>(mut self, label: S) -> Self {
        self.cancel_label = label.into();
        self
    }

    fn confirm_action(&self) -> Action {
        match self.selected {
            Choice::Ok => Action::PopupResult(PopupResult::Confirmed),
            Choice::Cancel => Action::PopupResult(PopupResult::Cancelled),
        }
    }

    fn toggle_selection(&mut self) {
        self.selected = match self.selected {
            Choice::Ok => Choice::Cancel,
            Choice::Cancel => Choice::Ok,
        };
    }
}

impl Component for ConfirmPopup {
    fn popup_min_size(&self) -> Option<(u16, u16)> {
        Some((self.min_width, self.min_height))
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_selection();
                None
            }
            KeyCode::Enter => Some(self.confirm_action()),
            KeyCode::Esc => Some(Action::PopupResult(PopupResult::Cancelled)),
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
        for l in self.question.lines() {
            lines.push(Line::from(Span::styled(l, self.theme.text_style())));
        }

        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }

        let selected = self.theme.selected_style();
        let unselected = self.theme.text_style();
        let ok_span = Span::styled(
            format!("[ {} ]", self.ok_label),
            if self.selected == Choice::Ok { selected } else { unselected },
        );
        let cancel_span = Span::styled(
            format!("[ {} ]", self.cancel_label),
            if self.selected == Choice::Cancel { selected } else { unselected },
        );

        let spacing = "   ";
        let buttons_len =
            (4 + self.ok_label.len()) + spacing.len() + (4 + self.cancel_label.len());
        let pad = (inner.width as usize).saturating_sub(buttons_len) / 2;
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            ok_span,
            Span::raw(spacing),
            cancel_span,
        ]));

        if inner.height >= 5 {
            lines.push(Line::raw(""));
            lines.push(
                Line::from(vec![
                    Span::raw("←/→/Tab: Select   "),
                    Span::raw("Enter: Confirm   "),
                    Span::raw("Esc: Cancel"),
                ])
                .style(self.theme.hint_style()),
            );
        }

        let para = Paragraph::new(Text::from(lines))
            .style(Style::default())
            .wrap(Wrap { trim: true });
        f.render_widget(para, inner);

        Ok(())
    }
}

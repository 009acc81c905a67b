use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::action::Action;
use crate::tui::{Event, EventResponse, Frame};

pub mod popup;
pub mod popups;

/// A self-contained visual element: receives events, may emit actions, and
/// draws itself. Popups implement this directly; pages compose it at a
/// higher level (see [`crate::pages::Page`]).
pub trait Component {
    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Minimum (width, height) when shown as a centered dialog.
    fn popup_min_size(&self) -> Option<(u16, u16)> {
        None
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::action::Action;
use crate::store::CarStore;
use crate::theme::Theme;
use crate::tui::{Event, EventResponse, Frame};

mod cars;
mod dashboard;
mod form;

pub use cars::CarsPage;
pub use dashboard::DashboardPage;
pub use form::FormPage;

/// A full-screen view. Pages read the shared [`CarStore`] but never mutate
/// it; every change they want flows back as an [`Action`] and comes around
/// through the store's reducer.
pub trait Page {
    fn name(&self) -> &'static str;

    fn handle_events(
        &mut self,
        event: Event,
        store: &CarStore,
    ) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event, store)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(
        &mut self,
        _key: KeyEvent,
        _store: &CarStore,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action, _store: &CarStore) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect, store: &CarStore, theme: &Theme)
        -> Result<()>;

    /// One-line key hints for the footer.
    fn hint_line(&self, _store: &CarStore) -> String {
        String::new()
    }
}

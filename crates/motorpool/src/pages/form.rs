//! The schema-driven record form.
//!
//! One page serves both the create and the edit flow; everything specific to
//! a flow lives in the [`FormSession`] it wraps. The page translates key
//! events into session mutations, renders the grouped sections, and emits
//! `FormEvent::SubmitRequested` once local validation has passed. Fetching
//! and persistence happen elsewhere; results come back in through
//! [`Page::update`] tagged with the session generation, and stale ones are
//! dropped.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use forms::{
    control_spec, ControlKind, FieldValue, FormMode, FormPhase, FormSession, SchemaField,
    SubmitOutcome,
};

use crate::action::{Action, FormEvent, Route};
use crate::store::CarStore;
use crate::theme::Theme;
use crate::tui::EventResponse;

use super::Page;

pub struct FormPage {
    session: FormSession,
    /// Linear index into the flattened field list.
    focused: usize,
    scroll: u16,
    editing: bool,
    input: Input,
    /// Set when the schema/record fetch failed for a create session; edit
    /// sessions navigate away instead.
    load_error: Option<String>,
}

impl FormPage {
    pub fn create(generation: u64) -> Self {
        Self::with_session(FormSession::create(generation))
    }

    pub fn edit(object_uuid: impl Into<String>, generation: u64) -> Self {
        Self::with_session(FormSession::edit(object_uuid, generation))
    }

    fn with_session(session: FormSession) -> Self {
        Self {
            session,
            focused: 0,
            scroll: 0,
            editing: false,
            input: Input::default(),
            load_error: None,
        }
    }

    fn title(&self) -> &'static str {
        match self.session.mode() {
            FormMode::Create => "Add car",
            FormMode::Edit { .. } => "Edit car",
        }
    }

    fn field_count(&self) -> usize {
        self.session
            .sections()
            .iter()
            .map(|s| s.fields.len())
            .sum()
    }

    fn focused_field(&self) -> Option<&SchemaField> {
        self.session
            .sections()
            .iter()
            .flat_map(|s| s.fields.iter())
            .nth(self.focused)
    }

    fn focus_next(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focused = (self.focused + 1) % count;
        }
    }

    fn focus_prev(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focused = (self.focused + count - 1) % count;
        }
    }

    fn start_editing(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let spec = control_spec(field);
        if spec.disabled || spec.kind.choices().is_some() {
            return;
        }
        let current = self
            .session
            .value(field.data_index())
            .map(FieldValue::display)
            .unwrap_or_default();
        self.input = Input::default().with_value(current);
        self.editing = true;
    }

    fn commit_editing(&mut self) {
        self.editing = false;
        let Some(field) = self.focused_field().cloned() else {
            return;
        };
        let spec = control_spec(&field);
        let mut text = self.input.value().to_string();
        self.input = Input::default();

        // Enforce the declared length cap on commit.
        if let ControlKind::TextInput { max_length: Some(max), .. }
        | ControlKind::TextArea { max_length: Some(max), .. } = &spec.kind
        {
            if text.chars().count() > *max as usize {
                text = text.chars().take(*max as usize).collect();
            }
        }

        let mut value = FieldValue::from_stored(field.column_type(), &text);
        if let (ControlKind::Number { min, max, precision }, FieldValue::Number(n)) =
            (&spec.kind, &value)
        {
            let mut n = *n;
            if let Some(min) = min {
                n = n.max(*min);
            }
            if let Some(max) = max {
                n = n.min(*max);
            }
            if let Some(p) = precision {
                let factor = 10f64.powi(*p as i32);
                n = (n * factor).round() / factor;
            }
            value = FieldValue::Number(n);
        }
        self.session.set_value(field.data_index(), value);
    }

    /// Cycle a bool/select field through its finite choices.
    fn cycle_choice(&mut self, dir: i64) {
        let Some(field) = self.focused_field().cloned() else {
            return;
        };
        let spec = control_spec(&field);
        if spec.disabled {
            return;
        }
        let Some(choices) = spec.kind.choices() else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let current = self
            .session
            .value(field.data_index())
            .map(FieldValue::to_wire)
            .unwrap_or_default();
        let position = choices.iter().position(|(value, _)| *value == current);
        let next = match position {
            Some(i) => (i as i64 + dir).rem_euclid(choices.len() as i64) as usize,
            None => 0,
        };
        let value = FieldValue::from_stored(field.column_type(), &choices[next].0);
        self.session.set_value(field.data_index(), value);
    }

    fn submit(&mut self) -> Option<Action> {
        match self.session.submit()? {
            SubmitOutcome::Rejected(_) => Some(Action::Update),
            SubmitOutcome::Payload(payload) => Some(Action::Form(FormEvent::SubmitRequested {
                generation: self.session.generation(),
                mode: self.session.mode().clone(),
                payload,
            })),
        }
    }

    fn display_value(&self, field: &SchemaField) -> String {
        let spec = control_spec(field);
        let raw = self
            .session
            .value(field.data_index())
            .map(FieldValue::to_wire)
            .unwrap_or_default();
        // Choice fields show the option label, not the stored value.
        if let Some(choices) = spec.kind.choices() {
            if let Some((_, label)) = choices.iter().find(|(value, _)| *value == raw) {
                return label.clone();
            }
        }
        raw
    }
}

impl Page for FormPage {
    fn name(&self) -> &'static str {
        "form"
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _store: &CarStore,
    ) -> Result<Option<EventResponse<Action>>> {
        if self.session.phase() == FormPhase::Loading {
            return Ok(match key.code {
                KeyCode::Esc => Some(EventResponse::Stop(Action::Navigate(Route::Cars))),
                KeyCode::Char('r') if self.load_error.is_some() => {
                    Some(EventResponse::Stop(Action::Refresh))
                }
                _ => None,
            });
        }

        if self.editing {
            return Ok(Some(match key.code {
                KeyCode::Enter => {
                    self.commit_editing();
                    EventResponse::Stop(Action::Update)
                }
                KeyCode::Esc => {
                    self.editing = false;
                    self.input = Input::default();
                    EventResponse::Stop(Action::Update)
                }
                _ => {
                    self.input.handle_event(&crossterm::event::Event::Key(key));
                    EventResponse::Stop(Action::Update)
                }
            }));
        }

        // Save from anywhere in the form.
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(self.submit().map(EventResponse::Stop));
        }

        let response = match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.focus_next();
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.focus_prev();
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Left => {
                self.cycle_choice(-1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                self.cycle_choice(1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Enter => {
                self.start_editing();
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Esc => Some(EventResponse::Stop(Action::Navigate(Route::Cars))),
            _ => None,
        };
        Ok(response)
    }

    fn update(&mut self, action: Action, _store: &CarStore) -> Result<Option<Action>> {
        if matches!(action, Action::Refresh) {
            self.load_error = None;
            return Ok(None);
        }
        let Action::Form(event) = action else {
            return Ok(None);
        };
        match event {
            FormEvent::SchemaLoaded { generation, fields } => {
                if !self.session.is_stale(generation) {
                    self.session.schema_loaded(fields);
                }
            }
            FormEvent::DetailLoaded { generation, detail } => {
                if !self.session.is_stale(generation) {
                    self.session.record_loaded(detail.value_details);
                }
            }
            FormEvent::LoadFailed { generation, message } => {
                if !self.session.is_stale(generation) {
                    self.load_error = Some(message);
                }
            }
            FormEvent::SubmitDone { generation, result } => {
                if !self.session.is_stale(generation) {
                    match result {
                        Ok(()) => self.session.submit_succeeded(),
                        Err(_) => self.session.submit_failed(),
                    }
                }
            }
            FormEvent::SubmitRequested { .. } => {}
        }
        Ok(None)
    }

    fn draw(
        &mut self,
        frame: &mut crate::tui::Frame<'_>,
        area: Rect,
        _store: &CarStore,
        theme: &Theme,
    ) -> Result<()> {
        let block = Block::default()
            .title(format!(" {} ", self.title()))
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_style(theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.session.phase() == FormPhase::Loading {
            let message = match &self.load_error {
                Some(err) => Line::from(Span::styled(
                    format!("Failed to load form: {err}"),
                    theme.error_style(),
                )),
                None => Line::from(Span::styled("Loading…", theme.hint_style())),
            };
            frame.render_widget(Paragraph::new(message), inner);
            return Ok(());
        }

        let mut lines: Vec<Line> = Vec::new();
        let mut focused_line: u16 = 0;
        let mut linear = 0usize;

        for section in self.session.sections() {
            lines.push(Line::from(Span::styled(
                format!("── {} ", section.title),
                theme.title_style(),
            )));
            for field in &section.fields {
                let focused = linear == self.focused;
                let spec = control_spec(field);
                if focused {
                    focused_line = lines.len() as u16;
                }

                let mut spans: Vec<Span> = Vec::new();
                let marker = if match self.session.mode() {
                    FormMode::Create => field.field.create_required,
                    FormMode::Edit { .. } => field.field.required,
                } {
                    "*"
                } else {
                    " "
                };
                spans.push(Span::styled(
                    format!("{marker}{:<24.24}", field.title()),
                    if spec.disabled {
                        theme.hint_style()
                    } else {
                        theme.label_style(focused)
                    },
                ));
                spans.push(Span::raw(" "));

                let value = if focused && self.editing {
                    format!("{}▏", self.input.value())
                } else {
                    self.display_value(field)
                };
                spans.push(Span::styled(value, theme.value_style(focused)));

                if let Some(choices) = spec.kind.choices() {
                    if focused && !choices.is_empty() {
                        spans.push(Span::styled("  ←/→", theme.hint_style()));
                    }
                }
                lines.push(Line::from(spans));

                if let Some(error) = self.session.error_for(field.data_index()) {
                    lines.push(Line::from(Span::styled(
                        format!("  {error}"),
                        theme.error_style(),
                    )));
                }
                linear += 1;
            }
            lines.push(Line::raw(""));
        }

        if self.field_count() == 0 {
            lines.push(Line::from(Span::styled("No fields", theme.hint_style())));
        }

        // Keep the focused line inside the viewport.
        let viewport = inner.height.saturating_sub(1).max(1);
        if focused_line < self.scroll {
            self.scroll = focused_line;
        } else if focused_line >= self.scroll + viewport {
            self.scroll = focused_line + 1 - viewport;
        }

        let paragraph = Paragraph::new(lines).scroll((self.scroll, 0));
        frame.render_widget(paragraph, inner);

        if self.session.phase() == FormPhase::Submitting {
            let status = Line::from(Span::styled("Saving…", theme.warning_style()));
            let status_area = Rect {
                x: inner.x,
                y: inner.y + inner.height.saturating_sub(1),
                width: inner.width,
                height: 1,
            };
            frame.render_widget(Paragraph::new(status), status_area);
        }

        Ok(())
    }

    fn hint_line(&self, _store: &CarStore) -> String {
        if self.session.phase() == FormPhase::Loading {
            return if self.load_error.is_some() {
                "r: retry · Esc: back".to_string()
            } else {
                "Esc: back".to_string()
            };
        }
        if self.editing {
            "Enter: confirm · Esc: cancel edit".to_string()
        } else if self.session.phase() == FormPhase::Submitting {
            "Saving…".to_string()
        } else {
            "↑/↓: fields · Enter: edit · ←/→: choose · Ctrl+S: save · Esc: back".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forms::{ColumnType, FieldDefinition};
    use pretty_assertions::assert_eq;

    fn definition(data_index: &str, column_type: ColumnType, props: &str) -> FieldDefinition {
        FieldDefinition {
            define_id: 1,
            title: data_index.to_uppercase(),
            data_index: data_index.to_string(),
            column_type,
            create_required: false,
            required: false,
            ui_field_properties: props.to_string(),
            selection_details: None,
        }
    }

    fn ready_page(fields: Vec<FieldDefinition>) -> FormPage {
        let mut page = FormPage::create(1);
        page.session.schema_loaded(fields);
        page
    }

    #[test]
    fn focus_wraps_across_all_sections() {
        let mut page = ready_page(vec![
            definition("a", ColumnType::String, r#"{"collapseId":"01"}"#),
            definition("b", ColumnType::String, r#"{"collapseId":"02"}"#),
        ]);
        assert_eq!(page.focused_field().unwrap().data_index(), "a");
        page.focus_next();
        assert_eq!(page.focused_field().unwrap().data_index(), "b");
        page.focus_next();
        assert_eq!(page.focused_field().unwrap().data_index(), "a");
        page.focus_prev();
        assert_eq!(page.focused_field().unwrap().data_index(), "b");
    }

    #[test]
    fn cycling_a_boolean_toggles_the_typed_value() {
        let mut page = ready_page(vec![definition("flag", ColumnType::Boolean, "")]);
        page.cycle_choice(1);
        assert_eq!(page.session.value("flag"), Some(&FieldValue::Bool(true)));
        page.cycle_choice(1);
        assert_eq!(page.session.value("flag"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn commit_applies_number_precision_and_bounds() {
        let mut page = ready_page(vec![definition(
            "rating",
            ColumnType::Double,
            r#"{"min":0,"max":5,"precision":1}"#,
        )]);
        page.start_editing();
        page.input = Input::default().with_value("4.449".to_string());
        page.editing = true;
        page.commit_editing();
        assert_eq!(page.session.value("rating"), Some(&FieldValue::Number(4.4)));

        page.start_editing();
        page.input = Input::default().with_value("99".to_string());
        page.editing = true;
        page.commit_editing();
        assert_eq!(page.session.value("rating"), Some(&FieldValue::Number(5.0)));
    }

    #[test]
    fn commit_truncates_to_max_length() {
        let mut page = ready_page(vec![definition(
            "code",
            ColumnType::String,
            r#"{"maxLength":3}"#,
        )]);
        page.editing = true;
        page.input = Input::default().with_value("ABCDE".to_string());
        page.commit_editing();
        assert_eq!(
            page.session.value("code"),
            Some(&FieldValue::Text("ABC".into()))
        );
    }

    #[test]
    fn disabled_fields_cannot_enter_editing() {
        let mut page = ready_page(vec![definition(
            "locked",
            ColumnType::String,
            r#"{"disabled":true}"#,
        )]);
        page.start_editing();
        assert!(!page.editing);
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut page = FormPage::create(2);
        page.update(
            Action::Form(FormEvent::SchemaLoaded {
                generation: 1,
                fields: vec![definition("a", ColumnType::String, "")],
            }),
            &CarStore::new(10),
        )
        .unwrap();
        assert_eq!(page.session.phase(), FormPhase::Loading);

        page.update(
            Action::Form(FormEvent::SchemaLoaded {
                generation: 2,
                fields: vec![definition("a", ColumnType::String, "")],
            }),
            &CarStore::new(10),
        )
        .unwrap();
        assert_eq!(page.session.phase(), FormPhase::Ready);
    }

    #[test]
    fn submit_rejection_stays_on_page() {
        let mut field = definition("name", ColumnType::String, "");
        field.create_required = true;
        let mut page = ready_page(vec![field]);
        assert_eq!(page.submit(), Some(Action::Update));
        assert_eq!(page.session.phase(), FormPhase::Ready);
        assert!(page.session.error_for("name").is_some());
    }

    #[test]
    fn submit_emits_payload_for_valid_forms() {
        let mut page = ready_page(vec![definition("name", ColumnType::String, "")]);
        page.session
            .set_value("name", FieldValue::Text("Carnival".into()));
        match page.submit() {
            Some(Action::Form(FormEvent::SubmitRequested {
                generation,
                mode,
                payload,
            })) => {
                assert_eq!(generation, 1);
                assert_eq!(mode, FormMode::Create);
                assert_eq!(payload[0].value, "Carnival");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        // No double submission while in flight.
        assert_eq!(page.submit(), None);
    }
}

//! The car list: schema-driven table, search, sort, pagination, and the
//! entry points into create/edit/delete.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use fleet_api::{CarRecord, RecordState, SortOrder};

use crate::action::{Action, Route};
use crate::config;
use crate::notify::Notice;
use crate::store::{CarStore, StoreEvent};
use crate::theme::Theme;
use crate::tui::EventResponse;

use super::Page;

const PAGE_SIZES: [u64; 4] = [10, 20, 50, 100];
const DEFAULT_COLUMN_WIDTH: u16 = 14;

pub struct CarsPage {
    table_state: TableState,
    selected: usize,
    keyword_input: Input,
    editing_search: bool,
}

impl CarsPage {
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            selected: 0,
            keyword_input: Input::default(),
            editing_search: false,
        }
    }

    fn selected_car<'a>(&self, store: &'a CarStore) -> Option<&'a CarRecord> {
        store
            .cars
            .get(self.selected.min(store.cars.len().saturating_sub(1)))
    }

    fn selected_uuid(&self, store: &CarStore) -> Option<String> {
        self.selected_car(store).map(|car| car.object_uuid.clone())
    }

    fn move_selection(&mut self, store: &CarStore, delta: i64) {
        let len = store.cars.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected.min(len - 1) as i64;
        self.selected = (current + delta).clamp(0, len as i64 - 1) as usize;
    }

    fn next_state_filter(current: Option<RecordState>) -> Option<RecordState> {
        match current {
            None => Some(RecordState::Active),
            Some(RecordState::Active) => Some(RecordState::SoftDeleted),
            Some(RecordState::SoftDeleted) => None,
        }
    }

    fn next_sort(&self, store: &CarStore) -> Option<StoreEvent> {
        if store.headers.is_empty() {
            return None;
        }
        let next_field = match store
            .headers
            .iter()
            .position(|h| h.data_index == store.search.field)
        {
            Some(i) => store.headers[(i + 1) % store.headers.len()].data_index.clone(),
            None => store.headers[0].data_index.clone(),
        };
        Some(StoreEvent::SetSort {
            field: next_field,
            order: store.search.order.unwrap_or(SortOrder::Asc),
        })
    }

    fn export_csv(&self, store: &CarStore) -> Result<PathBuf, std::io::Error> {
        let dir = config::get_data_dir();
        fs::create_dir_all(&dir)?;
        let name = format!("cars-{}.csv", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let path = dir.join(name);
        let mut file = fs::File::create(&path)?;

        let mut columns: Vec<&str> = vec!["objectUUID", "state"];
        columns.extend(store.headers.iter().map(|h| h.data_index.as_str()));
        writeln!(file, "{}", columns.join(","))?;

        for car in &store.cars {
            let mut cells = vec![csv_escape(&car.object_uuid), csv_escape(&car.state)];
            for header in &store.headers {
                cells.push(csv_escape(&car.text(&header.data_index)));
            }
            writeln!(file, "{}", cells.join(","))?;
        }
        Ok(path)
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Default for CarsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for CarsPage {
    fn name(&self) -> &'static str {
        "cars"
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        store: &CarStore,
    ) -> Result<Option<EventResponse<Action>>> {
        // Keyword entry swallows every key until committed or cancelled.
        if self.editing_search {
            return Ok(Some(match key.code {
                KeyCode::Enter => {
                    self.editing_search = false;
                    let keyword = self.keyword_input.value().trim().to_string();
                    let keyword = if keyword.is_empty() { None } else { Some(keyword) };
                    EventResponse::Stop(Action::Store(StoreEvent::SetKeyword(keyword)))
                }
                KeyCode::Esc => {
                    self.editing_search = false;
                    EventResponse::Stop(Action::Update)
                }
                _ => {
                    self.keyword_input
                        .handle_event(&crossterm::event::Event::Key(key));
                    EventResponse::Stop(Action::Update)
                }
            }));
        }

        let response = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(store, 1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(store, -1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = store.cars.len().saturating_sub(1);
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Char('/') => {
                self.editing_search = true;
                self.keyword_input = Input::default()
                    .with_value(store.search.keyword.clone().unwrap_or_default());
                Some(EventResponse::Stop(Action::Update))
            }
            KeyCode::Char('f') => Some(EventResponse::Stop(Action::Store(
                StoreEvent::SetStateFilter(Self::next_state_filter(store.search.state)),
            ))),
            KeyCode::Char('c') => Some(EventResponse::Stop(Action::Store(StoreEvent::ResetSearch))),
            KeyCode::Char('r') => Some(EventResponse::Stop(Action::Refresh)),
            KeyCode::Char('a') => Some(EventResponse::Stop(Action::Navigate(Route::CarCreate))),
            KeyCode::Enter | KeyCode::Char('e') => self
                .selected_uuid(store)
                .map(|uuid| EventResponse::Stop(Action::Navigate(Route::CarEdit(uuid)))),
            KeyCode::Char('d') => self.selected_car(store).map(|car| {
                if car.record_state() == Some(RecordState::SoftDeleted) {
                    EventResponse::Stop(Action::Notify(Notice::info("Car is already deleted")))
                } else {
                    EventResponse::Stop(Action::ConfirmDelete(car.object_uuid.clone()))
                }
            }),
            KeyCode::Char('n') => {
                let page = store.search.page;
                (page < store.pagination.page_count())
                    .then(|| EventResponse::Stop(Action::Store(StoreEvent::SetPage(page + 1))))
            }
            KeyCode::Char('p') => {
                let page = store.search.page;
                (page > 1).then(|| EventResponse::Stop(Action::Store(StoreEvent::SetPage(page - 1))))
            }
            KeyCode::Char(']') => {
                let i = PAGE_SIZES.iter().position(|&s| s == store.search.size);
                let next = PAGE_SIZES[(i.map(|i| i + 1).unwrap_or(0)) % PAGE_SIZES.len()];
                Some(EventResponse::Stop(Action::Store(StoreEvent::SetPageSize(next))))
            }
            KeyCode::Char('[') => {
                let i = PAGE_SIZES.iter().position(|&s| s == store.search.size).unwrap_or(0);
                let prev = PAGE_SIZES[(i + PAGE_SIZES.len() - 1) % PAGE_SIZES.len()];
                Some(EventResponse::Stop(Action::Store(StoreEvent::SetPageSize(prev))))
            }
            KeyCode::Char('s') => self.next_sort(store).map(|ev| EventResponse::Stop(Action::Store(ev))),
            KeyCode::Char('o') => {
                if store.search.field.is_empty() {
                    None
                } else {
                    Some(EventResponse::Stop(Action::Store(StoreEvent::SetSort {
                        field: store.search.field.clone(),
                        order: store.search.order.unwrap_or(SortOrder::Asc).toggled(),
                    })))
                }
            }
            KeyCode::Char('x') => Some(EventResponse::Stop(match self.export_csv(store) {
                Ok(path) => Action::Notify(Notice::success(format!(
                    "Exported {} cars to {}",
                    store.cars.len(),
                    path.display()
                ))),
                Err(err) => Action::Notify(Notice::error(format!("Export failed: {err}"))),
            })),
            KeyCode::Char('q') => Some(EventResponse::Continue(Action::Quit)),
            _ => None,
        };
        Ok(response)
    }

    fn update(&mut self, action: Action, store: &CarStore) -> Result<Option<Action>> {
        // Keep the selection inside the freshly loaded page.
        if let Action::Store(StoreEvent::CarsLoaded(_) | StoreEvent::CarRemoved(_)) = action {
            self.selected = self.selected.min(store.cars.len().saturating_sub(1));
        }
        Ok(None)
    }

    fn draw(
        &mut self,
        frame: &mut crate::tui::Frame<'_>,
        area: Rect,
        store: &CarStore,
        theme: &Theme,
    ) -> Result<()> {
        let rows_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        // Search bar.
        let keyword = if self.editing_search {
            self.keyword_input.value().to_string()
        } else {
            store.search.keyword.clone().unwrap_or_default()
        };
        let state_label = match store.search.state {
            None => "all",
            Some(state) => state.label(),
        };
        let mut search_spans = vec![
            Span::styled("keyword ", theme.hint_style()),
            Span::styled(
                format!("[{keyword}]"),
                theme.value_style(self.editing_search),
            ),
            Span::raw("  "),
            Span::styled("state ", theme.hint_style()),
            Span::styled(format!("[{state_label}]"), theme.value_style(false)),
        ];
        if self.editing_search {
            search_spans.push(Span::styled(
                "  Enter: apply · Esc: cancel",
                theme.hint_style(),
            ));
        }
        let search = Paragraph::new(Line::from(search_spans)).block(
            Block::default()
                .title(" Search ")
                .title_style(theme.title_style())
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(search, rows_layout[0]);

        // Table.
        if store.loading {
            frame.render_widget(
                Paragraph::new("Loading cars…").style(theme.hint_style()),
                rows_layout[1],
            );
        } else if store.cars.is_empty() {
            let message = store
                .load_error
                .as_deref()
                .map(|e| format!("Failed to load cars: {e}"))
                .unwrap_or_else(|| "No data".to_string());
            let style = if store.load_error.is_some() {
                theme.error_style()
            } else {
                theme.hint_style()
            };
            frame.render_widget(Paragraph::new(message).style(style), rows_layout[1]);
        } else {
            let header_cells: Vec<Span> = store
                .headers
                .iter()
                .map(|h| {
                    let mut title = h.title.clone();
                    if h.data_index == store.search.field {
                        if let Some(order) = store.search.order {
                            title = format!("{title} {}", order.arrow());
                        }
                    }
                    Span::styled(title, theme.title_style())
                })
                .collect();
            let widths: Vec<Constraint> = store
                .headers
                .iter()
                .map(|h| {
                    // Wire widths are browser pixels; scale down to cells.
                    let width = h
                        .column_props()
                        .width
                        .map(|w| (w / 8).clamp(8, 40))
                        .unwrap_or(DEFAULT_COLUMN_WIDTH);
                    Constraint::Length(width)
                })
                .collect();

            let rows: Vec<Row> = store
                .cars
                .iter()
                .map(|car| {
                    let style = if car.record_state() == Some(RecordState::SoftDeleted) {
                        theme.hint_style()
                    } else {
                        theme.text_style()
                    };
                    Row::new(
                        store
                            .headers
                            .iter()
                            .map(|h| Span::styled(car.text(&h.data_index), style))
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();

            self.selected = self.selected.min(store.cars.len().saturating_sub(1));
            self.table_state.select(Some(self.selected));

            let table = Table::new(rows, widths)
                .header(Row::new(header_cells).bottom_margin(1))
                .row_highlight_style(theme.selected_style())
                .block(
                    Block::default()
                        .title(" Cars ")
                        .title_style(theme.title_style())
                        .borders(Borders::ALL)
                        .border_style(theme.border_style()),
                );
            frame.render_stateful_widget(table, rows_layout[1], &mut self.table_state);
        }

        // Pagination footer.
        let mut footer = format!(
            "page {}/{} · {} items · size {}",
            store.pagination.current,
            store.pagination.page_count(),
            store.pagination.total,
            store.search.size,
        );
        if !store.search.field.is_empty() {
            if let Some(order) = store.search.order {
                footer.push_str(&format!(" · sort {} {}", store.search.field, order.arrow()));
            }
        }
        frame.render_widget(
            Paragraph::new(footer).style(theme.hint_style()),
            rows_layout[2],
        );

        Ok(())
    }

    fn hint_line(&self, _store: &CarStore) -> String {
        if self.editing_search {
            "Enter: apply search · Esc: cancel".to_string()
        } else {
            "a: add · e: edit · d: delete · /: search · f: filter · s/o: sort · n/p: page · x: export · r: refresh · q: quit"
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn state_filter_cycles_through_all_states() {
        assert_eq!(
            CarsPage::next_state_filter(None),
            Some(RecordState::Active)
        );
        assert_eq!(
            CarsPage::next_state_filter(Some(RecordState::Active)),
            Some(RecordState::SoftDeleted)
        );
        assert_eq!(
            CarsPage::next_state_filter(Some(RecordState::SoftDeleted)),
            None
        );
    }

    #[test]
    fn csv_escape_quotes_only_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut page = CarsPage::new();
        let store = CarStore::new(10);
        page.move_selection(&store, 1);
        assert_eq!(page.selected, 0);
    }
}

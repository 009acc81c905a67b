//! Aggregate statistics over the fetched record set.

use std::collections::BTreeMap;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
};

use fleet_api::RecordState;

use crate::action::Action;
use crate::store::CarStore;
use crate::theme::Theme;
use crate::tui::EventResponse;

use super::Page;

/// Well-known columns the statistics are derived from.
const MODEL_INDEX: &str = "carModal";
const YEAR_INDEX: &str = "carYear";
const UNKNOWN_BUCKET: &str = "Unknown";

pub struct DashboardPage;

impl DashboardPage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

struct Stats {
    total: usize,
    active: usize,
    deleted: usize,
    growth: f64,
    by_model: Vec<(String, u64)>,
    by_year: Vec<(String, u64)>,
}

fn collect_stats(store: &CarStore) -> Stats {
    let total = store.cars.len();
    let active = store
        .cars
        .iter()
        .filter(|c| c.record_state() == Some(RecordState::Active))
        .count();
    let deleted = store
        .cars
        .iter()
        .filter(|c| c.record_state() == Some(RecordState::SoftDeleted))
        .count();
    let growth = (active as f64 / total.max(1) as f64) * 100.0 - 80.0;

    let mut by_model: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_year: BTreeMap<String, u64> = BTreeMap::new();
    for car in &store.cars {
        let model = match car.text(MODEL_INDEX) {
            m if m.is_empty() => UNKNOWN_BUCKET.to_string(),
            m => m,
        };
        *by_model.entry(model).or_default() += 1;

        let year_raw = car.text(YEAR_INDEX);
        let year = year_raw
            .get(..4)
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
        *by_year.entry(year).or_default() += 1;
    }

    let mut by_model: Vec<(String, u64)> = by_model.into_iter().collect();
    by_model.sort_by(|a, b| b.1.cmp(&a.1));
    let by_year: Vec<(String, u64)> = by_year.into_iter().collect();

    Stats {
        total,
        active,
        deleted,
        growth,
        by_model,
        by_year,
    }
}

fn stat_tile<'a>(title: &'a str, value: String, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(title, theme.hint_style())),
        Line::from(Span::styled(value, theme.title_style())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style()),
    )
}

impl Page for DashboardPage {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _store: &CarStore,
    ) -> Result<Option<EventResponse<Action>>> {
        let action = match key.code {
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
        Ok(action.map(EventResponse::Continue))
    }

    fn draw(
        &mut self,
        frame: &mut crate::tui::Frame<'_>,
        area: Rect,
        store: &CarStore,
        theme: &Theme,
    ) -> Result<()> {
        if store.loading && store.cars.is_empty() {
            frame.render_widget(
                Paragraph::new("Loading dashboard data…").style(theme.hint_style()),
                area,
            );
            return Ok(());
        }

        let stats = collect_stats(store);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        // Summary tiles.
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(rows[0]);

        frame.render_widget(stat_tile("Total cars", stats.total.to_string(), theme), tiles[0]);
        frame.render_widget(
            stat_tile("Active cars", stats.active.to_string(), theme),
            tiles[1],
        );
        frame.render_widget(
            stat_tile("Deleted cars", stats.deleted.to_string(), theme),
            tiles[2],
        );
        let growth_text = format!(
            "{} {:.1}%",
            if stats.growth >= 0.0 { "↑" } else { "↓" },
            stats.growth
        );
        let growth_tile = Paragraph::new(vec![
            Line::from(Span::styled("Growth", theme.hint_style())),
            Line::from(Span::styled(
                growth_text,
                if stats.growth >= 0.0 {
                    theme.success_style()
                } else {
                    theme.error_style()
                },
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(growth_tile, tiles[3]);

        // Charts.
        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let year_data: Vec<(&str, u64)> = stats
            .by_year
            .iter()
            .map(|(year, count)| (year.as_str(), *count))
            .collect();
        let year_chart = BarChart::default()
            .block(
                Block::default()
                    .title(" Cars by year ")
                    .title_style(theme.title_style())
                    .borders(Borders::ALL)
                    .border_style(theme.border_style()),
            )
            .data(&year_data)
            .bar_width(5)
            .bar_gap(1)
            .bar_style(theme.text_style())
            .value_style(theme.title_style());
        frame.render_widget(year_chart, charts[0]);

        // Model distribution as labeled ratio bars.
        let mut lines: Vec<Line> = Vec::new();
        let inner_width = charts[1].width.saturating_sub(2) as usize;
        for (model, count) in stats.by_model.iter().take(12) {
            let pct = *count as f64 / stats.total.max(1) as f64;
            let bar_width = ((inner_width.saturating_sub(28)) as f64 * pct).round() as usize;
            lines.push(Line::from(vec![
                Span::styled(format!("{model:<16.16} "), theme.text_style()),
                Span::styled(format!("{count:>4} "), theme.hint_style()),
                Span::styled("█".repeat(bar_width.max(1)), theme.value_style(false)),
                Span::styled(format!(" {:.0}%", pct * 100.0), theme.hint_style()),
            ]));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled("No data", theme.hint_style())));
        }
        let model_chart = Paragraph::new(lines).block(
            Block::default()
                .title(" Cars by model ")
                .title_style(theme.title_style())
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(model_chart, charts[1]);

        Ok(())
    }

    fn hint_line(&self, _store: &CarStore) -> String {
        "r: refresh · 2: cars · q: quit".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_api::CarRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(uuid: &str, state: &str, model: &str, year: &str) -> CarRecord {
        let mut values = BTreeMap::new();
        values.insert(MODEL_INDEX.to_string(), json!(model));
        values.insert(YEAR_INDEX.to_string(), json!(year));
        CarRecord {
            object_uuid: uuid.to_string(),
            state: state.to_string(),
            values,
        }
    }

    #[test]
    fn stats_bucket_by_state_model_and_year() {
        let mut store = CarStore::new(10);
        store.cars = vec![
            record("a", "ACTIVE", "K5", "2021-03-01"),
            record("b", "ACTIVE", "K5", "2021-07-15"),
            record("c", "SOFT_DELETED", "EV6", "2022-01-01"),
            record("d", "ACTIVE", "", ""),
        ];
        let stats = collect_stats(&store);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.by_model[0], ("K5".to_string(), 2));
        assert!(stats.by_model.contains(&(UNKNOWN_BUCKET.to_string(), 1)));
        assert!(stats.by_year.contains(&("2021".to_string(), 2)));
        assert!(stats.by_year.contains(&(UNKNOWN_BUCKET.to_string(), 1)));
    }

    #[test]
    fn growth_follows_active_share() {
        let mut store = CarStore::new(10);
        store.cars = vec![
            record("a", "ACTIVE", "K5", "2021"),
            record("b", "SOFT_DELETED", "K5", "2021"),
        ];
        let stats = collect_stats(&store);
        assert_eq!(stats.growth, -30.0);

        let empty = CarStore::new(10);
        assert_eq!(collect_stats(&empty).growth, -80.0);
    }
}

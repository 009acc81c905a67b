//! Application loop.
//!
//! Owns the terminal, the action channel, the record store, the active page,
//! and the modal popup. Every state change flows through the channel as an
//! [`Action`]; the loop applies store events, runs side effects (spawning
//! API calls), and forwards the action to the popup or page that may care.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use fleet_api::{FleetClient, SearchParams};

use crate::action::{Action, FormEvent, PopupResult, Route};
use crate::components::popup::{centered_rect_fixed, render_backdrop};
use crate::components::popups::alert::AlertPopup;
use crate::components::popups::confirm::ConfirmPopup;
use crate::components::Component;
use crate::config::Config;
use crate::notify::{Notice, Notifications};
use crate::pages::{CarsPage, DashboardPage, FormPage, Page};
use crate::services;
use crate::store::{CarStore, StoreEvent};
use crate::theme::Theme;
use crate::tui::{Event, EventResponse, Frame, Tui};

/// The dashboard samples up to this many records for its statistics.
const DASHBOARD_PROBE_SIZE: u64 = 100;

pub struct App {
    theme: Theme,
    client: FleetClient,
    store: CarStore,
    route: Route,
    page: Box<dyn Page>,
    popup: Option<Box<dyn Component>>,
    pending_delete: Option<String>,
    notifications: Notifications,
    render_error: Option<String>,
    form_generation: u64,
    should_quit: bool,
    should_suspend: bool,
    tick_rate: f64,
    frame_rate: f64,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config, tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let client = FleetClient::new(&config.base_url, &config.token)?;
        let store = CarStore::new(config.page_size);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Ok(Self {
            theme: Theme::default(),
            client,
            store,
            route: Route::Dashboard,
            page: Box::new(DashboardPage::new()),
            popup: None,
            pending_delete: None,
            notifications: Notifications::default(),
            render_error: None,
            form_generation: 0,
            should_quit: false,
            should_suspend: false,
            tick_rate,
            frame_rate,
            action_tx,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;

        self.enter_route(Route::Dashboard);

        loop {
            if let Some(event) = tui.next().await {
                self.handle_event(event);
            }

            while let Ok(action) = self.action_rx.try_recv() {
                match action {
                    Action::Tick | Action::Render | Action::Update => {}
                    ref a => tracing::debug!("action: {a}"),
                }
                self.dispatch(action, &mut tui)?;
            }

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                self.action_tx.send(Action::Resume).ok();
                tui = Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop();
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        // The error view takes over all input until dismissed.
        if self.render_error.is_some() {
            if let Event::Key(key) = &event {
                match key.code {
                    KeyCode::Char('r') => {
                        self.render_error = None;
                        self.action_tx.send(Action::Refresh).ok();
                    }
                    KeyCode::Char('h') => {
                        self.render_error = None;
                        self.action_tx.send(Action::Navigate(Route::Dashboard)).ok();
                    }
                    KeyCode::Char('q') => {
                        self.action_tx.send(Action::Quit).ok();
                    }
                    _ => {}
                }
            }
            if matches!(event, Event::Render | Event::Resize(_, _)) {
                self.action_tx.send(Action::Render).ok();
            }
            if matches!(event, Event::Tick) {
                self.action_tx.send(Action::Tick).ok();
            }
            return;
        }

        let mut stopped = false;
        if let Some(popup) = self.popup.as_mut() {
            if let Ok(Some(response)) = popup.handle_events(event.clone()) {
                match response {
                    EventResponse::Continue(action) => {
                        self.action_tx.send(action).ok();
                    }
                    EventResponse::Stop(action) => {
                        self.action_tx.send(action).ok();
                        stopped = true;
                    }
                }
            }
            // Modal: a visible popup swallows all key input.
            if matches!(event, Event::Key(_)) {
                stopped = true;
            }
        }

        if !stopped {
            if let Ok(Some(response)) = self.page.handle_events(event.clone(), &self.store) {
                match response {
                    EventResponse::Continue(action) => {
                        self.action_tx.send(action).ok();
                    }
                    EventResponse::Stop(action) => {
                        self.action_tx.send(action).ok();
                        stopped = true;
                    }
                }
            }
        }

        if !stopped {
            if let Some(action) = self.global_action(&event) {
                self.action_tx.send(action).ok();
            }
        }

        match event {
            Event::Tick => {
                self.action_tx.send(Action::Tick).ok();
            }
            Event::Render => {
                self.action_tx.send(Action::Render).ok();
            }
            Event::Resize(w, h) => {
                self.action_tx.send(Action::Resize(w, h)).ok();
            }
            _ => {}
        }
    }

    fn global_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event
        else {
            return None;
        };
        match (code, *modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
            (KeyCode::Char('z'), KeyModifiers::CONTROL) => Some(Action::Suspend),
            (KeyCode::Char('1'), _) => Some(Action::Navigate(Route::Dashboard)),
            (KeyCode::Char('2'), _) => Some(Action::Navigate(Route::Cars)),
            _ => None,
        }
    }

    fn dispatch(&mut self, action: Action, tui: &mut Tui) -> Result<()> {
        match &action {
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Tick => self.notifications.prune(),
            Action::Resize(w, h) => {
                tui.resize(Rect::new(0, 0, *w, *h))?;
                self.draw(tui)?;
            }
            Action::Render => {
                self.draw(tui)?;
            }
            Action::Error(message) => {
                tracing::error!(%message, "render failure");
                self.render_error = Some(message.clone());
            }
            Action::Navigate(route) => {
                self.enter_route(route.clone());
            }
            Action::Refresh => self.refresh_route(),
            Action::Notify(notice) => self.notifications.push(notice.clone()),
            Action::ConfirmDelete(object_uuid) => {
                self.pending_delete = Some(object_uuid.clone());
                self.popup = Some(Box::new(
                    ConfirmPopup::new(
                        "Delete car",
                        "Delete this car?\nIt will be marked removed, not destroyed.",
                        self.theme.clone(),
                    )
                    .ok_label("Delete")
                    .cancel_label("Cancel"),
                ));
            }
            Action::ClosePopup => self.popup = None,
            Action::PopupResult(result) => {
                self.popup = None;
                let pending = self.pending_delete.take();
                if *result == PopupResult::Confirmed {
                    if let Some(object_uuid) = pending {
                        services::soft_delete_car(
                            self.client.clone(),
                            object_uuid,
                            self.action_tx.clone(),
                        );
                    }
                }
            }
            Action::Store(event) => {
                self.store.apply(event.clone());
                if let StoreEvent::CarsFailed(message) = event {
                    // The dashboard has no inline error surface; a dismissable
                    // alert stands in for it.
                    if self.route == Route::Dashboard && self.popup.is_none() {
                        self.popup = Some(Box::new(AlertPopup::new(
                            "Load failed",
                            format!("Statistics are unavailable.\n{message}"),
                            self.theme.clone(),
                        )));
                    }
                } else if search_changed(event) {
                    services::fetch_cars(
                        self.client.clone(),
                        self.store.search.clone(),
                        self.action_tx.clone(),
                    );
                }
            }
            Action::Form(event) => self.handle_form_event(event),
            Action::Update => {}
        }

        // Give the popup, then the page, a chance to react.
        if let Some(popup) = self.popup.as_mut() {
            if let Some(follow_up) = popup.update(action)? {
                self.action_tx.send(follow_up).ok();
            }
        } else if let Some(follow_up) = self.page.update(action, &self.store)? {
            self.action_tx.send(follow_up).ok();
        }
        Ok(())
    }

    fn handle_form_event(&mut self, event: &FormEvent) {
        match event {
            FormEvent::SubmitRequested {
                generation,
                mode,
                payload,
            } => {
                if *generation == self.form_generation {
                    services::submit_form(
                        self.client.clone(),
                        *generation,
                        mode.clone(),
                        payload.clone(),
                        self.action_tx.clone(),
                    );
                }
            }
            FormEvent::LoadFailed {
                generation,
                message,
            } => {
                if *generation != self.form_generation {
                    return;
                }
                self.notifications
                    .push(Notice::error(format!("Failed to load car data: {message}")));
                // Without a record there is nothing to edit; fall back to the
                // list. A create form stays and shows the error inline.
                if matches!(self.route, Route::CarEdit(_)) {
                    self.action_tx.send(Action::Navigate(Route::Cars)).ok();
                }
            }
            FormEvent::SubmitDone { generation, result } => {
                if *generation != self.form_generation {
                    return;
                }
                match result {
                    Ok(()) => {
                        let text = match self.route {
                            Route::CarEdit(_) => "Car updated successfully",
                            _ => "Car added successfully",
                        };
                        self.notifications.push(Notice::success(text));
                        self.action_tx.send(Action::Navigate(Route::Cars)).ok();
                    }
                    Err(message) => {
                        self.notifications
                            .push(Notice::error(format!("Save failed: {message}")));
                    }
                }
            }
            FormEvent::SchemaLoaded { .. } | FormEvent::DetailLoaded { .. } => {}
        }
    }

    fn enter_route(&mut self, route: Route) {
        // Precondition, not a server error: an edit without a usable id
        // never issues a request.
        let route = match route {
            Route::CarEdit(uuid) if uuid.trim().is_empty() => {
                self.notifications
                    .push(Notice::error("Invalid car id; returning to the list"));
                Route::Cars
            }
            other => other,
        };

        self.popup = None;
        self.pending_delete = None;
        self.route = route.clone();

        match route {
            Route::Dashboard => {
                self.page = Box::new(DashboardPage::new());
            }
            Route::Cars => {
                self.page = Box::new(CarsPage::new());
            }
            Route::CarCreate => {
                self.form_generation += 1;
                self.page = Box::new(FormPage::create(self.form_generation));
            }
            Route::CarEdit(ref uuid) => {
                self.form_generation += 1;
                self.page = Box::new(FormPage::edit(uuid.clone(), self.form_generation));
            }
        }
        self.refresh_route();
    }

    /// (Re-)issue the fetches the current route depends on.
    fn refresh_route(&mut self) {
        let tx = self.action_tx.clone();
        match &self.route {
            Route::Dashboard => {
                services::fetch_cars(
                    self.client.clone(),
                    SearchParams {
                        size: DASHBOARD_PROBE_SIZE,
                        ..SearchParams::default()
                    },
                    tx,
                );
            }
            Route::Cars => {
                services::fetch_table_headers(self.client.clone(), tx.clone());
                services::fetch_cars(self.client.clone(), self.store.search.clone(), tx);
            }
            Route::CarCreate => {
                services::fetch_create_schema(self.client.clone(), self.form_generation, tx);
            }
            Route::CarEdit(uuid) => {
                services::fetch_car_detail(
                    self.client.clone(),
                    uuid.clone(),
                    self.form_generation,
                    tx,
                );
            }
        }
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        let mut draw_failure: Option<String> = None;
        let page = &mut self.page;
        let store = &self.store;
        let theme = &self.theme;
        let route = &self.route;
        let render_error = &self.render_error;
        let popup = &mut self.popup;
        let notifications = &self.notifications;

        tui.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(frame.area());

            draw_tabs(frame, chunks[0], route, theme);

            if let Some(message) = render_error {
                draw_error_view(frame, chunks[1], message, theme);
            } else if let Err(err) = page.draw(frame, chunks[1], store, theme) {
                draw_failure = Some(format!("{err:?}"));
            }

            if let Some(popup) = popup.as_mut() {
                render_backdrop(frame, chunks[1]);
                let (min_w, min_h) = popup.popup_min_size().unwrap_or((60, 10));
                let dialog = centered_rect_fixed(chunks[1], min_w, min_h);
                let _ = popup.draw(frame, dialog);
            }

            if !notifications.is_empty() {
                notifications.draw(frame, chunks[1], theme);
            }

            let hints = page.hint_line(store);
            let footer = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(16)])
                .split(chunks[2]);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(hints, theme.hint_style()))),
                footer[0],
            );
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("motorpool {}", env!("CARGO_PKG_VERSION")),
                    theme.hint_style(),
                )))
                .right_aligned(),
                footer[1],
            );
        })?;

        if let Some(message) = draw_failure {
            self.action_tx.send(Action::Error(message)).ok();
        }
        Ok(())
    }
}

fn search_changed(event: &StoreEvent) -> bool {
    matches!(
        event,
        StoreEvent::SetKeyword(_)
            | StoreEvent::SetStateFilter(_)
            | StoreEvent::SetPage(_)
            | StoreEvent::SetPageSize(_)
            | StoreEvent::SetSort { .. }
            | StoreEvent::ResetSearch
    )
}

fn draw_tabs(frame: &mut Frame<'_>, area: Rect, route: &Route, theme: &Theme) {
    let selected = match route {
        Route::Dashboard => 0,
        _ => 1,
    };
    let tabs = Tabs::new(vec![" 1 Dashboard ", " 2 Cars "])
        .select(selected)
        .style(theme.hint_style())
        .highlight_style(theme.title_style())
        .divider("│");
    frame.render_widget(tabs, area);
}

fn draw_error_view(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled("Something went wrong", theme.error_style())),
        Line::raw(""),
        Line::from(Span::styled(message.to_string(), theme.text_style())),
        Line::raw(""),
        Line::from(Span::styled(
            "r: reload page · h: back to dashboard · q: quit",
            theme.hint_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).centered(), area);
}

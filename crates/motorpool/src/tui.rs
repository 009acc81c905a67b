//! Terminal lifecycle and event pump.
//!
//! Owns the crossterm terminal, raw mode, and the background task that turns
//! crossterm events plus tick/frame timers into the [`Event`] stream the
//! application loop consumes. The console is keyboard-driven; mouse capture
//! and bracketed paste are never enabled, so the pump forwards only key,
//! resize, and focus events.

use std::{
    ops::{Deref, DerefMut},
    time::{Duration, Instant},
};

use color_eyre::Result;
use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend as Backend;
use serde::{Deserialize, Serialize};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

pub type Frame<'a> = ratatui::Frame<'a>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Event {
    Init,
    Error,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// How a handler dealt with an event: emit an action and let the event keep
/// propagating, or emit and stop it here.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResponse<T> {
    Continue(T),
    Stop(T),
}

pub struct Tui {
    terminal: ratatui::Terminal<Backend<std::io::Stderr>>,
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
    event_rx: UnboundedReceiver<Event>,
    event_tx: UnboundedSender<Event>,
    frame_rate: f64,
    tick_rate: f64,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = ratatui::Terminal::new(Backend::new(std::io::stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            task: tokio::spawn(async {}),
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            frame_rate: 30.0,
            tick_rate: 4.0,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Spawn the event pump, replacing any previous one.
    fn start(&mut self) {
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancelled = self.cancellation_token.clone();
        let tx = self.event_tx.clone();
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate);

        self.task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick = tokio::time::interval(tick_delay);
            let mut render = tokio::time::interval(render_delay);
            let _ = tx.send(Event::Init);
            loop {
                let forwarded = tokio::select! {
                    _ = cancelled.cancelled() => break,
                    maybe = reader.next().fuse() => match maybe {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        Some(Ok(CrosstermEvent::Resize(w, h))) => Some(Event::Resize(w, h)),
                        Some(Ok(CrosstermEvent::FocusGained)) => Some(Event::FocusGained),
                        Some(Ok(CrosstermEvent::FocusLost)) => Some(Event::FocusLost),
                        // Key releases, plus mouse/paste events that were
                        // never opted into.
                        Some(Ok(_)) => None,
                        Some(Err(_)) => Some(Event::Error),
                        None => break,
                    },
                    _ = tick.tick() => Some(Event::Tick),
                    _ = render.tick() => Some(Event::Render),
                };
                if let Some(event) = forwarded {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });
    }

    /// Cancel the pump and wait briefly for it to wind down, aborting the
    /// task if it does not.
    pub fn stop(&self) {
        self.cancel();
        let deadline = Instant::now() + Duration::from_millis(100);
        while !self.task.is_finished() {
            if Instant::now() >= deadline {
                self.task.abort();
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnterAlternateScreen, cursor::Hide)?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
        }
        Self::restore()
    }

    /// Best-effort terminal restore: leave raw mode and the alternate
    /// screen. Associated rather than a method so the panic hook can call it
    /// without constructing a `Tui`.
    pub fn restore() -> Result<()> {
        if crossterm::terminal::is_raw_mode_enabled()? {
            crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()?;
        Ok(())
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<Backend<std::io::Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            tracing::error!("failed to restore terminal: {err:?}");
        }
    }
}

//! Interactive application loop.
//!
//! Single UI thread: state transitions happen in response to key events
//! and to fetch completions pumped from the worker channel. Completions
//! are routed by panel id and fetch token; anything stale or addressed to
//! a popped panel is logged and dropped.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use anyhow::Result;
use ratatui::Frame;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Paragraph;

use flowdeck_client::ResourceClient;
use flowdeck_ui::{Effect, Effects, NavigationStack, PanelMsg, Region, Theme, UiError};

use crate::fetch::{self, FetchCommand, FetchEvent};
use crate::screens::HomePanel;
use crate::settings::ResolvedConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(settings: ResolvedConfig, client: Arc<dyn ResourceClient>) -> Result<()> {
    let mut app = App::new(settings, client)?;
    app.run()
}

struct App {
    stack: NavigationStack,
    theme: Theme,
    status: Option<String>,
    fetch_tx: Sender<FetchCommand>,
    fetch_rx: Receiver<FetchEvent>,
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.fetch_tx.send(FetchCommand::Shutdown);
    }
}

impl App {
    fn new(settings: ResolvedConfig, client: Arc<dyn ResourceClient>) -> Result<Self> {
        let (fetch_tx, fetch_rx) = fetch::spawn(client);
        let root = HomePanel::new(settings.page_size, settings.kibana.clone());
        let mut effects = Effects::new();
        let stack = NavigationStack::new(Region::new("workspace"), Box::new(root), &mut effects)?;
        let mut app = Self {
            stack,
            theme: settings.theme,
            status: None,
            fetch_tx,
            fetch_rx,
        };
        app.apply_effects(effects)?;
        Ok(app)
    }

    fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        loop {
            self.pump_fetch_events()?;
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }

        ratatui::restore();
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(frame.area());
        self.stack.render(frame, layout[0], &self.theme);
        let status = self
            .status
            .as_deref()
            .unwrap_or("Ctrl+Q quit")
            .to_string();
        frame.render_widget(Paragraph::new(status).style(self.theme.status), layout[1]);
    }

    /// Returns `true` when the application should exit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return Ok(true);
        }
        self.status = None;
        let mut effects = Effects::new();
        self.stack.handle_key(key, &mut effects);
        self.apply_effects(effects)?;
        Ok(false)
    }

    fn apply_effects(&mut self, effects: Effects) -> Result<()> {
        for effect in self.stack.apply(effects)? {
            match effect {
                Effect::Load {
                    panel,
                    token,
                    collection,
                } => {
                    let _ = self.fetch_tx.send(FetchCommand::List {
                        panel,
                        token,
                        collection,
                    });
                }
                Effect::Invoke {
                    collection,
                    id,
                    command,
                } => {
                    let _ = self.fetch_tx.send(FetchCommand::Invoke {
                        collection,
                        id,
                        command,
                    });
                }
                Effect::OpenUrl(url) => match open::that(&url) {
                    Ok(()) => self.status = Some("opened visualization in browser".to_string()),
                    Err(err) => {
                        log::warn!("failed to open {url}: {err}");
                        self.status = Some(format!("failed to open browser: {err}"));
                    }
                },
                Effect::Status(text) => self.status = Some(text),
                other => log::error!("navigation effect left unconsumed: {other:?}"),
            }
        }
        Ok(())
    }

    fn pump_fetch_events(&mut self) -> Result<()> {
        loop {
            match self.fetch_rx.try_recv() {
                Ok(event) => self.handle_fetch_event(event)?,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(())
    }

    fn handle_fetch_event(&mut self, event: FetchEvent) -> Result<()> {
        match event {
            FetchEvent::Records {
                panel,
                token,
                outcome,
            } => {
                let mut effects = Effects::new();
                let msg = PanelMsg::Records { token, outcome };
                match self.stack.deliver(panel, msg, &mut effects) {
                    Ok(()) => self.apply_effects(effects)?,
                    Err(UiError::NotFound { .. }) => {
                        log::debug!("dropping fetch completion for popped panel {panel}");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            FetchEvent::Invoked {
                collection,
                id,
                command,
                outcome,
            } => match outcome {
                Ok(()) => {
                    log::info!("{command} {collection}/{id}: ok");
                    self.status = Some(format!("{command} {collection}/{id}: ok"));
                }
                Err(err) => {
                    log::warn!("{command} {collection}/{id} failed: {err}");
                    self.status = Some(format!("{command} {collection}/{id} failed: {err}"));
                }
            },
        }
        Ok(())
    }
}

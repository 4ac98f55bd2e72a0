//! Application orchestration layer.
//!
//! Wires identity store, connection manager, display state, and terminal UI
//! together, then runs a single event loop over input actions and status
//! changes. All mutable state is owned either by this loop or by the
//! connection worker; channels carry everything between them.

use crate::connection::{
    spawn_connection_manager, ConnectionHandle, Connector, RetryPolicy,
};
use crate::display::DisplayState;
use crate::error::Result;
use crate::identity::{IdentityProvider, RegisterIdentity};
use crate::input::{action_for_key, RegisterAction};
use crate::ui::{RegisterView, TerminalUI};
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// Poll interval for the blocking input thread.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spawn a blocking thread that polls the terminal and forwards register
/// actions onto a channel.
pub fn spawn_input_thread(
    tx: UnboundedSender<RegisterAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            match event::poll(poll_interval) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = action_for_key(key) {
                            if tx.send(action).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(err) => {
                        log::error!("input thread read error: {err}");
                        break;
                    }
                },
                Err(err) => {
                    log::error!("input thread poll error: {err}");
                    break;
                }
            }
        }
    })
}

/// Application orchestrator - coordinates components without duplicating
/// their state.
pub struct Application {
    identity: RegisterIdentity,
    conn: ConnectionHandle,
    conn_join: JoinHandle<()>,
    display: DisplayState,
    ui: TerminalUI,
}

impl Application {
    /// Create the application by initializing and wiring components together.
    pub fn new(
        identity_provider: &dyn IdentityProvider,
        connector: Arc<dyn Connector>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let identity = identity_provider.load_or_create()?;
        let (conn, conn_join) = spawn_connection_manager(connector, identity.clone(), retry);
        let display = DisplayState::new(conn.clone());

        Ok(Self {
            identity,
            conn,
            conn_join,
            display,
            ui: TerminalUI::new(),
        })
    }

    /// Run the interactive event loop until the operator quits.
    pub async fn run(mut self) -> Result<()> {
        self.ui.initialize()?;
        self.conn.start();

        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let input_shutdown = Arc::new(AtomicBool::new(false));
        let input_thread =
            spawn_input_thread(input_tx, Arc::clone(&input_shutdown), INPUT_POLL_INTERVAL);

        let mut status_rx = self.conn.subscribe();
        let mut view = RegisterView::new(self.identity.clone());
        view.status = self.conn.status();
        self.ui.render(&view)?;

        loop {
            tokio::select! {
                action = input_rx.recv() => {
                    match action {
                        Some(action) if self.apply_action(action) => {}
                        // Quit, or the input thread went away
                        _ => break,
                    }
                }
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        // Connection worker exited unexpectedly
                        break;
                    }
                }
            }

            view.display = self.display.buffer().to_string();
            view.status = status_rx.borrow().clone();
            self.ui.render(&view)?;
        }

        input_shutdown.store(true, Ordering::SeqCst);
        self.conn.stop();
        self.conn.shutdown();
        let _ = self.conn_join.await;
        let _ = input_thread.join();
        self.ui.cleanup()?;
        Ok(())
    }

    /// Apply one action to the display; returns false on quit.
    fn apply_action(&mut self, action: RegisterAction) -> bool {
        match action {
            RegisterAction::Digit(d) => self.display.append_digit(d),
            RegisterAction::DecimalPoint => self.display.append_decimal_point(),
            RegisterAction::Backspace => self.display.backspace(),
            RegisterAction::Clear => self.display.clear(),
            RegisterAction::Quit => return false,
        }
        true
    }
}

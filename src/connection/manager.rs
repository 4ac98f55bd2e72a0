//! Connection worker and its handle.
//!
//! The worker owns the single live transport and every status transition. It
//! consumes fire-and-forget commands from an unbounded channel and publishes
//! status through a `watch` channel, so no caller ever blocks on the network.
//! Updates sent while the link is down are dropped by design: the register
//! display is the local source of truth and the backend is a mirror that
//! catches up on the next successful update.

use crate::connection::retry::RetryPolicy;
use crate::connection::status::{ConnectionStatus, DisconnectCause};
use crate::connection::transport::{Connector, Link, LinkEvent};
use crate::identity::RegisterIdentity;
use crate::protocol::ClientMessage;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Commands accepted by the connection worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionCommand {
    /// Begin the connect sequence. Idempotent while connecting or connected.
    Start,
    /// Transmit an update; silently dropped unless currently connected.
    Send(f64),
    /// Release the transport and cancel any pending reconnect.
    Stop,
    /// Terminate the worker.
    Shutdown,
}

/// Cheap-to-clone handle to the connection worker.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    cmd_tx: mpsc::UnboundedSender<ConnectionCommand>,
    status_rx: watch::Receiver<ConnectionStatus>,
}

impl ConnectionHandle {
    /// Begin connecting. No-op while an attempt or session is already live.
    pub fn start(&self) {
        let _ = self.cmd_tx.send(ConnectionCommand::Start);
    }

    /// Best-effort update transmission; never errors, never queues.
    pub fn send(&self, total: f64) {
        let _ = self.cmd_tx.send(ConnectionCommand::Send(total));
    }

    /// Release the transport and suppress automatic reconnection.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(ConnectionCommand::Stop);
    }

    /// Terminate the worker task.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(ConnectionCommand::Shutdown);
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> ConnectionStatus {
        self.status_rx.borrow().clone()
    }

    /// Receiver observing every status transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }
}

#[cfg(test)]
impl ConnectionHandle {
    /// Handle wired to raw channels so tests can observe outgoing commands.
    pub(crate) fn test_pair() -> (
        Self,
        mpsc::UnboundedReceiver<ConnectionCommand>,
        watch::Sender<ConnectionStatus>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::initial());
        (Self { cmd_tx, status_rx }, cmd_rx, status_tx)
    }
}

/// Spawn the connection worker, returning its handle and join handle.
pub fn spawn_connection_manager(
    connector: Arc<dyn Connector>,
    identity: RegisterIdentity,
    retry: RetryPolicy,
) -> (ConnectionHandle, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(ConnectionStatus::initial());

    let worker = ConnectionWorker {
        cmd_rx,
        status_tx,
        connector,
        identity,
        retry,
    };
    let join = tokio::spawn(worker.run());

    (ConnectionHandle { cmd_tx, status_rx }, join)
}

/// Outcome of a connect attempt.
enum Establish {
    Link(Box<dyn Link>),
    Failed(DisconnectCause),
    Stopped,
    Shutdown,
}

/// Outcome of an online session.
enum Session {
    Lost(DisconnectCause),
    Stopped,
    Shutdown,
}

/// Outcome of the reconnect wait.
enum Backoff {
    Retry,
    Exhausted,
    Stopped,
    Shutdown,
}

/// Whether the worker returns to idle or exits.
enum Flow {
    Idle,
    Exit,
}

struct ConnectionWorker {
    cmd_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    status_tx: watch::Sender<ConnectionStatus>,
    connector: Arc<dyn Connector>,
    identity: RegisterIdentity,
    retry: RetryPolicy,
}

impl ConnectionWorker {
    async fn run(mut self) {
        loop {
            // Idle: disconnected with no reconnect pending.
            match self.cmd_rx.recv().await {
                None | Some(ConnectionCommand::Shutdown) => break,
                Some(ConnectionCommand::Stop) => {
                    self.publish(ConnectionStatus::Disconnected(DisconnectCause::Stopped));
                }
                Some(ConnectionCommand::Send(total)) => {
                    log::debug!("dropping update {total} while idle");
                }
                Some(ConnectionCommand::Start) => {
                    if let Flow::Exit = self.drive_connection().await {
                        break;
                    }
                }
            }
        }
        log::debug!("connection worker for {} exited", self.identity);
    }

    /// Run connect/online/backoff cycles until stopped or shut down.
    async fn drive_connection(&mut self) -> Flow {
        let mut failures: u32 = 0;
        loop {
            self.publish(ConnectionStatus::Connecting);

            let cause = match self.establish().await {
                Establish::Link(link) => {
                    failures = 0;
                    match self.online(link).await {
                        Session::Lost(cause) => cause,
                        Session::Stopped => {
                            self.publish(ConnectionStatus::Disconnected(
                                DisconnectCause::Stopped,
                            ));
                            return Flow::Idle;
                        }
                        Session::Shutdown => return Flow::Exit,
                    }
                }
                Establish::Failed(cause) => cause,
                Establish::Stopped => {
                    self.publish(ConnectionStatus::Disconnected(DisconnectCause::Stopped));
                    return Flow::Idle;
                }
                Establish::Shutdown => return Flow::Exit,
            };

            log::warn!("connection down: {cause:?}");
            self.publish(ConnectionStatus::Disconnected(cause));
            failures += 1;

            match self.reconnect_wait(failures).await {
                Backoff::Retry => continue,
                Backoff::Exhausted => {
                    log::warn!("retry policy exhausted after {failures} failures");
                    return Flow::Idle;
                }
                Backoff::Stopped => {
                    self.publish(ConnectionStatus::Disconnected(DisconnectCause::Stopped));
                    return Flow::Idle;
                }
                Backoff::Shutdown => return Flow::Exit,
            }
        }
    }

    /// Drive one connect attempt while staying responsive to commands.
    async fn establish(&mut self) -> Establish {
        let connector = Arc::clone(&self.connector);
        let connect = connector.connect();
        tokio::pin!(connect);

        loop {
            tokio::select! {
                result = &mut connect => {
                    return match result {
                        Ok(link) => Establish::Link(link),
                        Err(err) => Establish::Failed(DisconnectCause::Error(err.to_string())),
                    };
                }
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(ConnectionCommand::Shutdown) => return Establish::Shutdown,
                    // The pending connect future is dropped here, releasing
                    // any half-open transport.
                    Some(ConnectionCommand::Stop) => return Establish::Stopped,
                    Some(ConnectionCommand::Start) => {} // already connecting
                    Some(ConnectionCommand::Send(total)) => {
                        log::debug!("dropping update {total} while connecting");
                    }
                },
            }
        }
    }

    /// Handshake plus the connected session. The link is owned here and
    /// dropped on return, so the transport is always released before any
    /// reconnect attempt begins.
    async fn online(&mut self, mut link: Box<dyn Link>) -> Session {
        self.publish(ConnectionStatus::Connected);
        log::info!("connected; registering as {}", self.identity);

        let handshake = match ClientMessage::register_connect(&self.identity).to_frame() {
            Ok(frame) => frame,
            Err(err) => return Session::Lost(DisconnectCause::Error(err.to_string())),
        };
        if let Err(err) = link.send_text(handshake).await {
            return Session::Lost(DisconnectCause::Error(err.to_string()));
        }

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(ConnectionCommand::Shutdown) => return Session::Shutdown,
                    Some(ConnectionCommand::Stop) => return Session::Stopped,
                    Some(ConnectionCommand::Start) => {} // already connected
                    Some(ConnectionCommand::Send(total)) => {
                        let frame = match ClientMessage::update(&self.identity, total).to_frame() {
                            Ok(frame) => frame,
                            Err(err) => {
                                log::error!("could not encode update: {err}");
                                continue;
                            }
                        };
                        if let Err(err) = link.send_text(frame).await {
                            return Session::Lost(DisconnectCause::Error(err.to_string()));
                        }
                    }
                },
                event = link.next_event() => match event {
                    LinkEvent::Message(frame) => {
                        log::trace!("ignoring server frame: {frame}");
                    }
                    LinkEvent::Closed => return Session::Lost(DisconnectCause::Lost),
                    LinkEvent::Error(reason) => {
                        return Session::Lost(DisconnectCause::Error(reason));
                    }
                },
            }
        }
    }

    /// Sleep out the reconnect delay, cancellable by stop/shutdown.
    async fn reconnect_wait(&mut self, failures: u32) -> Backoff {
        let Some(delay) = self.retry.delay_for(failures) else {
            return Backoff::Exhausted;
        };

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Backoff::Retry,
                cmd = self.cmd_rx.recv() => match cmd {
                    None | Some(ConnectionCommand::Shutdown) => return Backoff::Shutdown,
                    Some(ConnectionCommand::Stop) => return Backoff::Stopped,
                    Some(ConnectionCommand::Start) => {} // reconnect already scheduled
                    Some(ConnectionCommand::Send(total)) => {
                        log::debug!("dropping update {total} while waiting to reconnect");
                    }
                },
            }
        }
    }

    fn publish(&self, next: ConnectionStatus) {
        debug_assert!(
            self.status_tx.borrow().can_transition_to(&next),
            "invalid status transition {:?} -> {next:?}",
            *self.status_tx.borrow(),
        );
        let _ = self.status_tx.send(next);
    }
}

//! Async driver for one board session.
//!
//! The session owns the [`BoardController`] and is the only thing that touches
//! it. It waits on two things at once: host events and the single in-flight
//! fetch. A refresh requested while a fetch is pending aborts that fetch and
//! starts a new generation, so at most one fetch runs and only the newest
//! result is ever applied.

use crate::controller::{
    BoardController, BoardSnapshot, ClickOutcome, RefreshOutcome, RefreshPhase, RefreshTicket,
};
use crate::error::{FetchError, SessionClosed};
use crate::post::PostRecord;
use crate::source::PostSource;
use postboard_ui3d::{ClickEvent, SceneHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_QUEUE: usize = 256;

/// Input to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A click delivered by the host.
    Click(ClickEvent),
    /// Refresh without going through the button.
    Refresh,
    /// Toggle the background without going through the button.
    ToggleBackground,
    /// Dispose the board and end the session.
    Shutdown,
}

type FetchResult = Result<Vec<PostRecord>, FetchError>;

struct InFlight {
    ticket: RefreshTicket,
    task: JoinHandle<FetchResult>,
}

/// Runs a board until shutdown.
pub struct BoardSession<H: SceneHost> {
    controller: BoardController<H>,
    source: Arc<dyn PostSource>,
    fetch_timeout: Duration,
    events: mpsc::Receiver<SessionEvent>,
    snapshots: watch::Sender<BoardSnapshot>,
    inflight: Option<InFlight>,
    initial: Option<RefreshTicket>,
    events_handled: u64,
}

/// Caller side of a session: send events, observe state.
#[derive(Debug)]
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    snapshots: watch::Receiver<BoardSnapshot>,
    sent: u64,
}

impl<H: SceneHost + Send + 'static> BoardSession<H> {
    /// Start the board and pair it with a handle. The initial fetch begins
    /// once [`run`](Self::run) is polled.
    pub fn new(
        mut controller: BoardController<H>,
        source: Arc<dyn PostSource>,
        fetch_timeout: Duration,
    ) -> (Self, SessionHandle) {
        let initial = controller.start();
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);
        let (snapshots_tx, snapshots_rx) = watch::channel(controller.snapshot());

        let session = Self {
            controller,
            source,
            fetch_timeout,
            events: events_rx,
            snapshots: snapshots_tx,
            inflight: None,
            initial: Some(initial),
            events_handled: 0,
        };
        let handle = SessionHandle {
            events: events_tx,
            snapshots: snapshots_rx,
            sent: 0,
        };
        (session, handle)
    }

    /// Serve events until shutdown, then dispose the board.
    ///
    /// Returns the disposed controller so its host can be inspected.
    pub async fn run(mut self) -> BoardController<H> {
        if let Some(ticket) = self.initial.take() {
            self.spawn_fetch(ticket);
        }

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    match event {
                        Some(SessionEvent::Shutdown) | None => break,
                        Some(event) => self.handle_event(event),
                    }
                    self.events_handled += 1;
                }
                (ticket, result) = wait_for_fetch(&mut self.inflight) => {
                    self.inflight = None;
                    self.finish_refresh(ticket, result);
                }
            }
            self.publish();
        }

        if let Some(fetch) = self.inflight.take() {
            debug!(generation = fetch.ticket.generation, "Aborting fetch on shutdown");
            fetch.task.abort();
        }
        self.controller.dispose();
        // Count the shutdown itself so waiters see it handled
        self.events_handled += 1;
        self.publish();
        info!("Board session ended");
        self.controller
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Click(click) => match self.controller.handle_click(&click) {
                ClickOutcome::RefreshRequested => self.refresh(),
                ClickOutcome::Revealed { post_id } => {
                    debug!(post = %post_id, user = %click.user, "Post revealed");
                }
                ClickOutcome::BackgroundToggled(_) | ClickOutcome::Ignored => {}
            },
            SessionEvent::Refresh => self.refresh(),
            SessionEvent::ToggleBackground => {
                self.controller.toggle_background();
            }
            SessionEvent::Shutdown => {}
        }
    }

    fn refresh(&mut self) {
        let ticket = self.controller.begin_refresh();
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&mut self, ticket: RefreshTicket) {
        if let Some(stale) = self.inflight.take() {
            debug!(
                stale = stale.ticket.generation,
                current = ticket.generation,
                "Aborting superseded fetch"
            );
            stale.task.abort();
        }

        let source = Arc::clone(&self.source);
        let timeout = self.fetch_timeout;
        let task = tokio::spawn(async move {
            match tokio::time::timeout(timeout, source.fetch_posts()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(timeout)),
            }
        });
        self.inflight = Some(InFlight { ticket, task });
    }

    fn finish_refresh(&mut self, ticket: RefreshTicket, result: FetchResult) {
        match self.controller.complete_refresh(ticket, result) {
            RefreshOutcome::Rendered { generation, posts, skipped } => {
                debug!(generation, posts, skipped, "Refresh applied");
            }
            RefreshOutcome::Failed { generation, error } => {
                warn!(generation, %error, "Refresh failed; board left empty");
            }
            RefreshOutcome::Stale { generation } => {
                debug!(generation, "Stale refresh result ignored");
            }
        }
    }

    fn publish(&self) {
        let mut snapshot = self.controller.snapshot();
        snapshot.events_handled = self.events_handled;
        self.snapshots.send_replace(snapshot);
    }
}

/// Resolve when the in-flight fetch finishes; never resolves when there is none.
async fn wait_for_fetch(inflight: &mut Option<InFlight>) -> (RefreshTicket, FetchResult) {
    let Some(fetch) = inflight.as_mut() else {
        return std::future::pending().await;
    };
    let result = match (&mut fetch.task).await {
        Ok(result) => result,
        Err(err) => Err(FetchError::Task(err.to_string())),
    };
    (fetch.ticket, result)
}

impl SessionHandle {
    async fn send(&mut self, event: SessionEvent) -> Result<(), SessionClosed> {
        self.events.send(event).await.map_err(|_| SessionClosed)?;
        self.sent += 1;
        Ok(())
    }

    /// Forward a host click.
    pub async fn click(&mut self, event: ClickEvent) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Click(event)).await
    }

    pub async fn refresh(&mut self) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Refresh).await
    }

    pub async fn toggle_background(&mut self) -> Result<(), SessionClosed> {
        self.send(SessionEvent::ToggleBackground).await
    }

    /// Ask the session to dispose the board and stop.
    pub async fn shutdown(&mut self) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Shutdown).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until every event sent through this handle is handled and no
    /// refresh is pending.
    pub async fn wait_idle(&mut self) -> Result<BoardSnapshot, SessionClosed> {
        let sent = self.sent;
        let snapshot = self
            .snapshots
            .wait_for(|s| s.events_handled >= sent && s.phase == RefreshPhase::Idle)
            .await
            .map_err(|_| SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Observe every published state change.
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshots.clone()
    }
}

//! Async driver running a [`SyncEngine`] on a tokio task.
//!
//! Field events, clear-all, submission and buffer queries arrive over an
//! mpsc command channel. Store notifications are forwarded into the loop by
//! a subscription. Between messages the task sleeps until the engine's next
//! deadline.

use crate::config::SessionConfig;
use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use crate::event::{FieldEvent, ViewUpdate};
use crate::timer::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tavi_mail::{Outbound, SubmitTrigger, compose};
use tavi_report::{FieldIssue, validate};
use tavi_store::{PersistedStore, Subscription};
use tavi_types::{FieldKey, FieldSchema, PersistedState, Snapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

const COMMAND_BUFFER: usize = 64;

/// Identifies one form session in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new time-ordered session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum Command {
    Field(FieldEvent),
    ClearAll(oneshot::Sender<SyncResult<()>>),
    Submit {
        trigger: SubmitTrigger,
        reply: oneshot::Sender<SyncResult<Option<Outbound>>>,
    },
    Buffer(oneshot::Sender<Snapshot>),
    Issues(oneshot::Sender<Vec<FieldIssue>>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Sends a field event. Errors from the engine are logged by the
    /// session, not returned.
    pub async fn send(&self, event: FieldEvent) -> SyncResult<()> {
        self.commands
            .send(Command::Field(event))
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }

    pub async fn focus(&self, key: impl Into<FieldKey>) -> SyncResult<()> {
        self.send(FieldEvent::Focus(key.into())).await
    }

    pub async fn change(&self, key: impl Into<FieldKey>, value: impl Into<String>) -> SyncResult<()> {
        self.send(FieldEvent::Change {
            key: key.into(),
            value: value.into(),
        })
        .await
    }

    pub async fn blur(&self, key: impl Into<FieldKey>) -> SyncResult<()> {
        self.send(FieldEvent::Blur(key.into())).await
    }

    pub async fn commit_key(&self, key: impl Into<FieldKey>) -> SyncResult<()> {
        self.send(FieldEvent::CommitKey(key.into())).await
    }

    /// Clears every field and waits for the empty snapshot to be written.
    pub async fn clear_all(&self) -> SyncResult<()> {
        self.request(Command::ClearAll).await?
    }

    /// Composes the outbound message from the current buffer.
    pub async fn submit(&self, trigger: SubmitTrigger) -> SyncResult<Option<Outbound>> {
        self.request(|reply| Command::Submit { trigger, reply }).await?
    }

    /// A copy of the edit buffer.
    pub async fn buffer(&self) -> SyncResult<Snapshot> {
        self.request(Command::Buffer).await
    }

    /// Pattern errors and range advisories for the current buffer.
    pub async fn issues(&self) -> SyncResult<Vec<FieldIssue>> {
        self.request(Command::Issues).await
    }

    /// Stops the session, writing any pending autosave first.
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.request(Command::Shutdown).await
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> SyncResult<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        rx.await.map_err(|_| SyncError::ChannelClosed)
    }
}

/// The session task.
pub struct FormSession {
    id: SessionId,
    engine: SyncEngine,
    store: Arc<dyn PersistedStore>,
    config: SessionConfig,
    origin: Instant,
    commands: mpsc::Receiver<Command>,
    store_events: mpsc::UnboundedReceiver<()>,
    views: mpsc::UnboundedSender<ViewUpdate>,
    _subscription: Subscription,
}

impl FormSession {
    /// Starts a session on the current tokio runtime.
    ///
    /// Returns the command handle and the stream of view updates for the
    /// renderer. The session ends on [`SessionHandle::shutdown`] or when
    /// every handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(
        schema: Arc<FieldSchema>,
        store: Arc<dyn PersistedStore>,
        config: SessionConfig,
    ) -> SyncResult<(SessionHandle, mpsc::UnboundedReceiver<ViewUpdate>)> {
        let id = SessionId::new();
        let engine = SyncEngine::new(schema, store.clone(), config.sync)?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (store_tx, store_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = mpsc::unbounded_channel();

        let subscription = store.subscribe(Arc::new(move |_: &PersistedState| {
            let _ = store_tx.send(());
        }));

        let session = Self {
            id,
            engine,
            store,
            config,
            origin: Instant::now(),
            commands: command_rx,
            store_events: store_rx,
            views: view_tx,
            _subscription: subscription,
        };
        let span = info_span!("form_session", session_id = %id);
        tokio::spawn(session.run().instrument(span));

        Ok((
            SessionHandle {
                id,
                commands: command_tx,
            },
            view_rx,
        ))
    }

    async fn run(mut self) {
        info!("Form session started");
        loop {
            let deadline = self
                .engine
                .next_deadline()
                .map(|ms| self.origin + Duration::from_millis(ms));

            tokio::select! {
                biased;

                command = self.commands.recv() => {
                    let Some(command) = command else {
                        self.finish();
                        break;
                    };
                    self.advance();
                    if self.handle(command).is_break() {
                        break;
                    }
                }
                Some(()) = self.store_events.recv() => {
                    self.advance();
                    if let Err(e) = self.engine.sync_from_store() {
                        warn!("Failed to reconcile store change: {e}");
                    }
                }
                () = sleep_until(deadline) => self.advance(),
            }
            self.publish_views();
        }
        self.publish_views();
        info!("Form session stopped");
    }

    /// Applies one command. Breaks once the session has shut down.
    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        let now = self.now();
        match command {
            Command::Field(event) => {
                if let Err(e) = self.engine.handle(event, now) {
                    warn!("Field event rejected: {e}");
                }
            }
            Command::ClearAll(reply) => {
                let _ = reply.send(self.engine.clear_all());
            }
            Command::Submit { trigger, reply } => {
                let _ = reply.send(self.submit(trigger));
            }
            Command::Buffer(reply) => {
                let _ = reply.send(self.engine.buffer().clone());
            }
            Command::Issues(reply) => {
                let _ = reply.send(validate(self.engine.schema(), self.engine.buffer()));
            }
            Command::Shutdown(reply) => {
                self.finish();
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn submit(&self, trigger: SubmitTrigger) -> SyncResult<Option<Outbound>> {
        let recipients = self.store.get()?.recipients;
        let outbound = compose(
            self.engine.schema(),
            self.engine.buffer(),
            &recipients,
            trigger,
            self.config.report.mode,
            &self.config.mail,
        )?;
        Ok(outbound)
    }

    fn advance(&mut self) {
        let now = self.now();
        if let Err(e) = self.engine.advance(now) {
            warn!("Timer handling failed: {e}");
        }
    }

    fn finish(&mut self) {
        self.advance();
        if let Err(e) = self.engine.flush_pending() {
            warn!("Final autosave failed: {e}");
        }
    }

    fn publish_views(&mut self) {
        for view in self.engine.drain_views() {
            if self.views.send(view).is_err() {
                debug!("View receiver dropped");
            }
        }
    }

    fn now(&self) -> Millis {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(Millis::MAX)
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

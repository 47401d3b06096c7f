//! Sync engine: state machine between the edit buffer and the store.
//!
//! The engine owns the edit buffer and the only field-data writer to the
//! persisted store. It has no clock and no task of its own: every operation
//! takes `now`, and [`SyncEngine::advance`] fires the timers that have come
//! due. [`FormSession`](crate::FormSession) drives it on a tokio task.

use crate::autosave::{AutosaveFire, AutosaveScheduler};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::event::{FieldEvent, Reconciliation, ViewUpdate};
use crate::gate::SyncGate;
use crate::navigation::NavigationController;
use crate::timer::{Deadline, Millis};
use std::collections::BTreeSet;
use std::sync::Arc;
use tavi_store::PersistedStore;
use tavi_types::{Error as SchemaError, FieldKey, FieldSchema, PersistedState, Snapshot};
use tracing::{debug, info, warn};

/// Timers in the order they fire when due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Timer {
    NavigationSettle,
    BlurRelease,
    AutosaveDebounce,
    AutosaveSettle,
    BlurFlush,
}

/// How the engine learned the stored snapshot it last reconciled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncedBy {
    Load,
    Write,
    Merge,
}

/// The sync engine.
pub struct SyncEngine {
    schema: Arc<FieldSchema>,
    store: Arc<dyn PersistedStore>,
    config: SyncConfig,
    /// What the user currently sees.
    buffer: Snapshot,
    /// Keys edited since the last successful flush of the live buffer.
    dirty: BTreeSet<FieldKey>,
    gate: SyncGate,
    /// The stored snapshot the buffer was last reconciled with: loaded at
    /// startup, written by this engine, or merged from the store.
    synced: Snapshot,
    synced_by: SyncedBy,
    /// An external change arrived while the gate was closed.
    reconcile_pending: bool,
    auto_save_enabled: bool,
    autosave: AutosaveScheduler,
    navigation: NavigationController,
    blur_release: Deadline,
    blur_flush: Deadline,
    views: Vec<ViewUpdate>,
}

impl SyncEngine {
    /// Creates an engine whose buffer starts from the stored snapshot.
    pub fn new(
        schema: Arc<FieldSchema>,
        store: Arc<dyn PersistedStore>,
        config: SyncConfig,
    ) -> SyncResult<Self> {
        let state = store.get()?;
        schema.validate(&state.snapshot)?;
        debug!(
            "Sync engine starting with {} stored value(s)",
            state.snapshot.iter().filter(|(_, v)| !v.is_empty()).count()
        );
        Ok(Self {
            autosave: AutosaveScheduler::new(&config),
            navigation: NavigationController::new(config.navigation_settle_ms),
            buffer: state.snapshot.clone(),
            synced: state.snapshot,
            synced_by: SyncedBy::Load,
            auto_save_enabled: state.auto_save_enabled,
            schema,
            store,
            config,
            dirty: BTreeSet::new(),
            gate: SyncGate::Idle,
            reconcile_pending: false,
            blur_release: Deadline::default(),
            blur_flush: Deadline::default(),
            views: Vec::new(),
        })
    }

    // ── Accessors ────────────────────────────────────────────────

    #[must_use]
    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The edit buffer.
    #[must_use]
    pub fn buffer(&self) -> &Snapshot {
        &self.buffer
    }

    #[must_use]
    pub fn gate(&self) -> &SyncGate {
        &self.gate
    }

    #[must_use]
    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }

    #[must_use]
    pub fn dirty_keys(&self) -> Vec<FieldKey> {
        self.dirty.iter().cloned().collect()
    }

    #[must_use]
    pub fn auto_save_enabled(&self) -> bool {
        self.auto_save_enabled
    }

    #[must_use]
    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    #[must_use]
    pub fn reconcile_pending(&self) -> bool {
        self.reconcile_pending
    }

    /// The earliest pending timer, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.next_timer().map(|(at, _)| at)
    }

    /// Takes the view updates produced since the last call.
    pub fn drain_views(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.views)
    }

    // ── Field events ─────────────────────────────────────────────

    /// Dispatches a rendering-layer event.
    pub fn handle(&mut self, event: FieldEvent, now: Millis) -> SyncResult<()> {
        match event {
            FieldEvent::Focus(key) => self.focus(key.as_str()),
            FieldEvent::Change { key, value } => self.change(key.as_str(), value, now),
            FieldEvent::Blur(key) => self.blur(key.as_str(), now),
            FieldEvent::CommitKey(key) => self.commit_key(key.as_str(), now).map(|_| ()),
        }
    }

    /// A field gained focus.
    ///
    /// Cancels a pending blur release so the gate cannot open under a newly
    /// focused field. Focus reports are ignored while navigating; the move
    /// decides where focus lands.
    pub fn focus(&mut self, key: &str) -> SyncResult<()> {
        let key = self.known_key(key)?;
        if matches!(self.gate, SyncGate::Navigating { .. }) {
            debug!("Ignoring focus on {key} while navigating");
            return Ok(());
        }
        self.blur_release.cancel();
        self.gate = SyncGate::Editing(key);
        Ok(())
    }

    /// A field's value changed. Writes the buffer and re-arms autosave.
    pub fn change(&mut self, key: &str, value: impl Into<String>, now: Millis) -> SyncResult<()> {
        let key = self.known_key(key)?;
        self.buffer.set(key.as_str(), value)?;
        self.dirty.insert(key);
        self.autosave.arm(now);
        Ok(())
    }

    /// A field lost focus. The gate opens after the blur grace delay.
    pub fn blur(&mut self, key: &str, now: Millis) -> SyncResult<()> {
        let key = self.known_key(key)?;
        match &self.gate {
            SyncGate::Navigating { .. } => {
                debug!("Ignoring blur of {key} while navigating");
            }
            SyncGate::Editing(focused) if *focused == key => {
                self.blur_release.arm(now + self.config.blur_grace_ms);
            }
            _ => debug!("Ignoring blur of unfocused field {key}"),
        }
        Ok(())
    }

    /// The commit key was pressed in `key`.
    ///
    /// Flushes the buffer immediately, bypassing the debounce, and starts
    /// moving focus to the next field. Returns the destination, or `None`
    /// on the last field, where the key does nothing else.
    pub fn commit_key(&mut self, key: &str, now: Millis) -> SyncResult<Option<FieldKey>> {
        let key = self.known_key(key)?;
        self.blur_release.cancel();
        self.autosave.cancel();

        let next = NavigationController::next_key(&self.schema, key.as_str());
        match &next {
            Some(to) => {
                debug!("Navigating from {key} to {to}");
                self.navigation.begin(to.clone(), now);
                self.gate = SyncGate::Navigating {
                    from: key,
                    to: to.clone(),
                };
            }
            None => {
                debug!("Commit key on last field {key}");
                self.navigation.cancel();
                self.gate = SyncGate::Editing(key);
            }
        }
        self.persist()?;
        Ok(next)
    }

    // ── Store notifications ──────────────────────────────────────

    /// The store signalled a change. Reconciles against its current state,
    /// so a backlog of notifications never replays stale snapshots.
    pub fn sync_from_store(&mut self) -> SyncResult<Reconciliation> {
        let state = self.store.get()?;
        self.on_external(state)
    }

    /// The persisted store changed to `state`.
    ///
    /// Turning autosave off purges the stored field values; the buffer keeps
    /// them for the rest of the session.
    pub fn on_external(&mut self, state: PersistedState) -> SyncResult<Reconciliation> {
        self.schema.validate(&state.snapshot)?;
        let disabled = self.auto_save_enabled && !state.auto_save_enabled;
        self.auto_save_enabled = state.auto_save_enabled;

        if disabled {
            self.reconcile_pending = false;
            if !state.snapshot.is_blank() {
                info!("Autosave disabled, purging stored field values");
                let empty = self.schema.empty_snapshot();
                self.write_snapshot(empty)?;
            }
            return Ok(Reconciliation::Unchanged);
        }
        if self.synced == state.snapshot {
            self.reconcile_pending = false;
            return Ok(match self.synced_by {
                SyncedBy::Write => Reconciliation::SelfNotification,
                SyncedBy::Load | SyncedBy::Merge => Reconciliation::Unchanged,
            });
        }
        if !self.gate.is_open() {
            debug!("Deferring external change, gate is {:?}", self.gate);
            self.reconcile_pending = true;
            return Ok(Reconciliation::Deferred);
        }

        let updated = self.merge(&state.snapshot)?;
        self.synced = state.snapshot;
        self.synced_by = SyncedBy::Merge;
        self.reconcile_pending = false;
        if !updated.is_empty() {
            info!("Merged {} field(s) from the store", updated.len());
            self.views.push(ViewUpdate::FieldsReplaced {
                keys: updated.clone(),
            });
        }
        Ok(Reconciliation::Merged { updated })
    }

    /// Incoming values win unless the buffer holds a non-empty value edited
    /// since the last flush.
    fn merge(&mut self, incoming: &Snapshot) -> SyncResult<Vec<FieldKey>> {
        let mut updated = Vec::new();
        for (key, value) in incoming.iter() {
            let current = self.buffer.value(key.as_str());
            if self.dirty.contains(key) && !current.is_empty() {
                continue;
            }
            if current != value {
                updated.push(key.clone());
            }
        }
        for key in &updated {
            self.buffer.set(key.as_str(), incoming.value(key.as_str()))?;
            self.dirty.remove(key);
        }
        Ok(updated)
    }

    // ── Reset ────────────────────────────────────────────────────

    /// Clears every field and writes the empty snapshot through.
    ///
    /// All timers are cancelled before the write, so nothing scheduled
    /// earlier can land afterwards and resurrect old values.
    pub fn clear_all(&mut self) -> SyncResult<()> {
        self.gate = SyncGate::Resetting;
        self.autosave.cancel();
        self.navigation.cancel();
        self.blur_release.cancel();
        self.blur_flush.cancel();
        self.reconcile_pending = false;

        let empty = self.schema.empty_snapshot();
        self.buffer = empty.clone();
        self.dirty.clear();

        let written = self.write_snapshot(empty);
        self.gate = SyncGate::Idle;
        written?;
        info!("Cleared all fields");
        self.views.push(ViewUpdate::Cleared);
        Ok(())
    }

    // ── Timers ───────────────────────────────────────────────────

    /// Fires every timer due at or before `now`, earliest first. Timers
    /// armed by a firing timer are measured from its deadline, not `now`.
    pub fn advance(&mut self, now: Millis) -> SyncResult<()> {
        while let Some((at, timer)) = self.next_timer() {
            if at > now {
                break;
            }
            self.fire(timer, at)?;
        }
        Ok(())
    }

    /// Writes a pending autosave immediately. Used when the session ends.
    pub fn flush_pending(&mut self) -> SyncResult<()> {
        if self.autosave.is_pending() {
            self.autosave.cancel();
            self.persist()?;
        }
        Ok(())
    }

    fn next_timer(&self) -> Option<(Millis, Timer)> {
        [
            (self.navigation.deadline(), Timer::NavigationSettle),
            (self.blur_release.at(), Timer::BlurRelease),
            (self.autosave.debounce_at(), Timer::AutosaveDebounce),
            (self.autosave.settle_at(), Timer::AutosaveSettle),
            (self.blur_flush.at(), Timer::BlurFlush),
        ]
        .into_iter()
        .filter_map(|(at, timer)| at.map(|at| (at, timer)))
        .min()
    }

    fn fire(&mut self, timer: Timer, at: Millis) -> SyncResult<()> {
        match timer {
            Timer::NavigationSettle => {
                if let Some(to) = self.navigation.take_due(at) {
                    self.gate = SyncGate::Editing(to.clone());
                    self.views.push(ViewUpdate::FocusField {
                        key: to,
                        select_all: true,
                    });
                }
            }
            Timer::BlurRelease => {
                self.blur_release.cancel();
                if matches!(self.gate, SyncGate::Editing(_)) {
                    self.gate = SyncGate::Idle;
                }
                if self.reconcile_pending && self.gate.is_open() {
                    self.sync_from_store()?;
                }
                self.blur_flush.arm(at + self.config.blur_flush_ms);
            }
            Timer::AutosaveDebounce => {
                let focus_held = self.gate.holds_focus();
                match self.autosave.fire_debounce(at, focus_held) {
                    Some(AutosaveFire::Write) => self.persist()?,
                    Some(AutosaveFire::Settling { until }) => {
                        debug!("Autosave waiting for focused field until {until}");
                    }
                    None => {}
                }
            }
            Timer::AutosaveSettle => {
                if self.autosave.fire_settle(at) {
                    self.persist()?;
                }
            }
            Timer::BlurFlush => {
                self.blur_flush.cancel();
                if self.gate.is_open()
                    && self.auto_save_enabled
                    && !self.dirty.is_empty()
                    && !self.autosave.is_pending()
                {
                    debug!("Post-blur flush of {} unsaved field(s)", self.dirty.len());
                    self.persist()?;
                }
            }
        }
        Ok(())
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Writes the buffer, or the empty snapshot when autosave is disabled.
    /// The autosave flag is taken from the store at write time.
    fn persist(&mut self) -> SyncResult<()> {
        let mut state = self.store.get()?;
        self.auto_save_enabled = state.auto_save_enabled;
        let target = if state.auto_save_enabled {
            self.buffer.clone()
        } else {
            self.schema.empty_snapshot()
        };
        state.snapshot = target.clone();
        self.store.set(state)?;
        self.synced = target;
        self.synced_by = SyncedBy::Write;
        if self.auto_save_enabled {
            self.dirty.clear();
            debug!("Autosaved edit buffer");
        } else {
            debug!("Autosave disabled, wrote empty snapshot");
        }
        Ok(())
    }

    fn write_snapshot(&mut self, snapshot: Snapshot) -> SyncResult<()> {
        let mut state = self.store.get()?;
        state.snapshot = snapshot.clone();
        self.store.set(state)?;
        self.synced = snapshot;
        self.synced_by = SyncedBy::Write;
        Ok(())
    }

    fn known_key(&self, key: &str) -> SyncResult<FieldKey> {
        match self.schema.get(key) {
            Some(descriptor) => Ok(descriptor.key.clone()),
            None => {
                warn!("Event for unknown field {key}");
                Err(SchemaError::UnknownField(key.to_string()).into())
            }
        }
    }
}

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot, watch};

use super::error::StateError;
use super::state::{Applied, PinExport, PinState};
use crate::{Coordinates, PinAction, PinActionKind, PinId, PinPatch, RawPinAction, now_millis};

type Reply = oneshot::Sender<Result<Applied, StateError>>;

struct Dispatch {
    action: PinAction,
    reply: Option<Reply>,
}

/// Handle to a pin collection owned by a single reducer task.
///
/// Dispatches are queued on an unbounded FIFO channel and reduced one at a
/// time, so two reductions never observe each other's intermediate state and
/// overlapping triggers apply in arrival order. Every applied action
/// publishes a fresh [`PinState`] to subscribers; no-ops publish nothing.
///
/// Handles are cheap to clone; the reducer task exits once every handle is
/// dropped.
#[derive(Debug, Clone)]
pub struct PinStore {
    queue: mpsc::UnboundedSender<Dispatch>,
    state: watch::Receiver<PinState>,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("action", &self.action)
            .field("awaited", &self.reply.is_some())
            .finish()
    }
}

impl PinStore {
    /// Spawn the reducer task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        Self::spawn_with(PinState::new())
    }

    /// Spawn the reducer task seeded with `initial`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn spawn_with(initial: PinState) -> Self {
        let (queue, inbox) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(initial);
        tokio::spawn(reduce_queue(inbox, publisher));
        Self { queue, state }
    }

    /// Queue `action` and wait for its reduction.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoOpDispatch`] when the action changed nothing
    /// and [`StateError::StoreClosed`] when the reducer task has stopped.
    pub async fn dispatch(&self, action: PinAction) -> Result<Applied, StateError> {
        let (reply, outcome) = oneshot::channel();
        self.enqueue(action, Some(reply))?;
        outcome.await.map_err(|_| StateError::StoreClosed)?
    }

    /// Decode and dispatch an untyped action.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidDispatch`] without touching state when
    /// the action kind or payload is not recognised; otherwise as
    /// [`PinStore::dispatch`].
    pub async fn dispatch_raw(&self, raw: RawPinAction) -> Result<Applied, StateError> {
        let action = PinAction::try_from(raw).inspect_err(|err| {
            warn!("rejected pin action: {err}");
        })?;
        self.dispatch(action).await
    }

    /// Queue `action` without waiting for it.
    ///
    /// Safe to call from a state observer: the action is reduced after the
    /// reduction currently being published.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::StoreClosed`] when the reducer task has stopped.
    pub fn submit(&self, action: PinAction) -> Result<(), StateError> {
        self.enqueue(action, None)
    }

    fn enqueue(&self, action: PinAction, reply: Option<Reply>) -> Result<(), StateError> {
        self.queue
            .send(Dispatch { action, reply })
            .map_err(|_| StateError::StoreClosed)
    }

    /// The most recently published state.
    #[must_use]
    pub fn snapshot(&self) -> PinState {
        self.state.borrow().clone()
    }

    /// Whether a pending pin currently exists.
    #[must_use]
    pub fn has_pending_pin(&self) -> bool {
        self.state.borrow().has_pending_pin()
    }

    /// Receive every published state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PinState> {
        self.state.clone()
    }

    /// Export pins and the action log, stamped with the current time.
    #[must_use]
    pub fn export(&self) -> PinExport {
        self.state.borrow().export(now_millis())
    }

    /// Drop or move the pending pin.
    ///
    /// # Errors
    ///
    /// See [`PinStore::dispatch`].
    pub async fn set_pending_pin(&self, coordinates: Coordinates) -> Result<Applied, StateError> {
        self.dispatch(PinAction::now(PinActionKind::SetPendingPin(coordinates)))
            .await
    }

    /// Edit the pending pin.
    ///
    /// # Errors
    ///
    /// See [`PinStore::dispatch`].
    pub async fn update_pending_pin(&self, patch: PinPatch) -> Result<Applied, StateError> {
        self.dispatch(PinAction::now(PinActionKind::UpdatePendingPin(patch)))
            .await
    }

    /// Promote the pending pin to a permanent pin.
    ///
    /// # Errors
    ///
    /// See [`PinStore::dispatch`].
    pub async fn finalize_pending_pin(&self, patch: PinPatch) -> Result<Applied, StateError> {
        self.dispatch(PinAction::now(PinActionKind::FinalizePendingPin(patch)))
            .await
    }

    /// Discard the pending pin.
    ///
    /// # Errors
    ///
    /// See [`PinStore::dispatch`].
    pub async fn clear_pending_pin(&self) -> Result<Applied, StateError> {
        self.dispatch(PinAction::now(PinActionKind::ClearPendingPin))
            .await
    }

    /// Remove a finalised pin.
    ///
    /// # Errors
    ///
    /// See [`PinStore::dispatch`].
    pub async fn delete_pin(&self, id: PinId) -> Result<Applied, StateError> {
        self.dispatch(PinAction::now(PinActionKind::DeletePin(id)))
            .await
    }
}

async fn reduce_queue(
    mut inbox: mpsc::UnboundedReceiver<Dispatch>,
    publisher: watch::Sender<PinState>,
) {
    while let Some(Dispatch { action, reply }) = inbox.recv().await {
        let mut outcome = Err(StateError::StoreClosed);
        publisher.send_if_modified(|state| {
            outcome = state.apply(action);
            outcome.is_ok()
        });
        match &outcome {
            Ok(applied) => debug!("applied {} as action #{}", applied.kind, applied.sequence),
            Err(err) if err.is_no_op() => debug!("{err}"),
            Err(err) => warn!("pin reduction failed: {err}"),
        }
        if let Some(reply) = reply
            && reply.send(outcome).is_err()
        {
            debug!("dispatcher stopped waiting before its reduction completed");
        }
    }
    debug!("pin store reducer stopped");
}

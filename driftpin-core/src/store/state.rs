use serde::{Deserialize, Serialize};

use super::error::{NoOpReason, StateError};
use crate::{PendingPin, Pin, PinAction, PinActionKind, PinId};

/// In-memory pin collection plus its append-only action log.
///
/// The pending pin lives in its own slot, so "is there a pending pin" can
/// never disagree with the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinState {
    pins: Vec<Pin>,
    pending: Option<PendingPin>,
    actions: Vec<PinAction>,
}

/// Result of a reduction that changed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Position of the action in the log, starting at 1.
    pub sequence: usize,
    /// Kind of the applied action.
    pub kind: &'static str,
    /// Identity minted by a finalize, if any.
    pub minted: Option<PinId>,
}

/// Plain serialisable snapshot of pins and the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinExport {
    /// Finalised pins followed by the pending pin, if any.
    pub pins: Vec<Pin>,
    /// Every applied action in completion order.
    pub actions: Vec<PinAction>,
    /// When the snapshot was taken, in milliseconds since the Unix epoch.
    pub exported_at: i64,
}

impl PinState {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalised pins in creation order.
    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// The pending pin, if one is being edited.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingPin> {
        self.pending.as_ref()
    }

    /// Whether a pending pin exists.
    #[must_use]
    pub const fn has_pending_pin(&self) -> bool {
        self.pending.is_some()
    }

    /// Applied actions in completion order.
    #[must_use]
    pub fn actions(&self) -> &[PinAction] {
        &self.actions
    }

    /// Look up a finalised pin.
    #[must_use]
    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|pin| &pin.id == id)
    }

    /// Finalised pins plus the pending pin rendered with the sentinel id, as
    /// a map layer would draw them.
    #[must_use]
    pub fn visible_pins(&self) -> Vec<Pin> {
        self.pins
            .iter()
            .cloned()
            .chain(self.pending.as_ref().map(PendingPin::to_pin))
            .collect()
    }

    /// Snapshot for export or debugging.
    #[must_use]
    pub fn export(&self, exported_at: i64) -> PinExport {
        PinExport {
            pins: self.visible_pins(),
            actions: self.actions.clone(),
            exported_at,
        }
    }

    /// Reduce `action` into the state, minting ids with [`PinId::generate`].
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoOpDispatch`] when the action cannot change
    /// anything; state and log are left untouched.
    pub fn apply(&mut self, action: PinAction) -> Result<Applied, StateError> {
        self.apply_with(action, PinId::generate)
    }

    /// Reduce `action`, drawing fresh identities from `mint`.
    ///
    /// `mint` is retried until it yields an id that is neither the pending
    /// sentinel nor already in use.
    ///
    /// # Errors
    ///
    /// See [`PinState::apply`].
    pub fn apply_with(
        &mut self,
        action: PinAction,
        mut mint: impl FnMut() -> PinId,
    ) -> Result<Applied, StateError> {
        let kind = action.name();
        let no_op = |reason| StateError::NoOpDispatch { kind, reason };
        let mut minted = None;

        match &action.kind {
            PinActionKind::SetPendingPin(coordinates) => {
                self.pending = Some(PendingPin::at(*coordinates, action.timestamp));
            }
            PinActionKind::UpdatePendingPin(patch) => {
                let pending = self
                    .pending
                    .as_mut()
                    .ok_or_else(|| no_op(NoOpReason::NoPendingPin))?;
                pending.apply(patch);
            }
            PinActionKind::FinalizePendingPin(patch) => {
                let mut pending = self
                    .pending
                    .take()
                    .ok_or_else(|| no_op(NoOpReason::NoPendingPin))?;
                if patch.timestamp.is_none() {
                    pending.timestamp = action.timestamp;
                }
                pending.apply(patch);
                let id = self.fresh_id(&mut mint);
                minted = Some(id.clone());
                self.pins.push(pending.finalize(id));
            }
            PinActionKind::ClearPendingPin => {
                self.pending
                    .take()
                    .ok_or_else(|| no_op(NoOpReason::NoPendingPin))?;
            }
            PinActionKind::DeletePin(id) if id.is_pending() => {
                self.pending
                    .take()
                    .ok_or_else(|| no_op(NoOpReason::UnknownPin(id.clone())))?;
            }
            PinActionKind::DeletePin(id) => {
                let index = self
                    .pins
                    .iter()
                    .position(|pin| &pin.id == id)
                    .ok_or_else(|| no_op(NoOpReason::UnknownPin(id.clone())))?;
                self.pins.remove(index);
            }
        }

        self.actions.push(action);
        Ok(Applied {
            sequence: self.actions.len(),
            kind,
            minted,
        })
    }

    fn fresh_id(&self, mint: &mut impl FnMut() -> PinId) -> PinId {
        loop {
            let candidate = mint();
            if !candidate.is_pending() && self.pin(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

//! Pin actions: the only way to change the pin collection.
//!
//! On the wire an action is `{ "type": KIND, "payload": ..., "timestamp": ms }`
//! ([`RawPinAction`]). Typed [`PinAction`] values serialise to that shape and
//! deserialise from it, rejecting unknown kinds with
//! [`StateError::InvalidDispatch`].

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Coordinates, PinId, PinPatch, StateError};

/// Wire name of [`PinActionKind::SetPendingPin`].
pub const SET_PENDING_PIN: &str = "SET_PENDING_PIN";
/// Wire name of [`PinActionKind::UpdatePendingPin`].
pub const UPDATE_PENDING_PIN: &str = "UPDATE_PENDING_PIN";
/// Wire name of [`PinActionKind::FinalizePendingPin`].
pub const FINALIZE_PENDING_PIN: &str = "FINALIZE_PENDING_PIN";
/// Wire name of [`PinActionKind::ClearPendingPin`].
pub const CLEAR_PENDING_PIN: &str = "CLEAR_PENDING_PIN";
/// Wire name of [`PinActionKind::DeletePin`].
pub const DELETE_PIN: &str = "DELETE_PIN";

/// Milliseconds since the Unix epoch according to the system clock.
///
/// Clocks set before 1970 read as `0`.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// The mutation an action requests.
#[derive(Debug, Clone, PartialEq)]
pub enum PinActionKind {
    /// Drop (or move) the pending pin.
    SetPendingPin(Coordinates),
    /// Edit the pending pin in place.
    UpdatePendingPin(PinPatch),
    /// Promote the pending pin to a permanent pin.
    FinalizePendingPin(PinPatch),
    /// Discard the pending pin.
    ClearPendingPin,
    /// Remove a pin. The pending sentinel id discards the pending pin.
    DeletePin(PinId),
}

impl PinActionKind {
    /// Wire name of the action kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetPendingPin(_) => SET_PENDING_PIN,
            Self::UpdatePendingPin(_) => UPDATE_PENDING_PIN,
            Self::FinalizePendingPin(_) => FINALIZE_PENDING_PIN,
            Self::ClearPendingPin => CLEAR_PENDING_PIN,
            Self::DeletePin(_) => DELETE_PIN,
        }
    }
}

/// A timestamped request to mutate the pin collection.
///
/// # Examples
///
/// ```
/// use driftpin_core::{Coordinates, PinAction, PinActionKind};
/// use serde_json::json;
///
/// let action = PinAction::new(
///     PinActionKind::SetPendingPin(Coordinates::new(1.0, 2.0)),
///     1_700_000_000_000,
/// );
/// let wire = serde_json::to_value(&action).expect("actions serialise");
/// assert_eq!(
///     wire,
///     json!({
///         "type": "SET_PENDING_PIN",
///         "payload": {"longitude": 1.0, "latitude": 2.0},
///         "timestamp": 1_700_000_000_000_i64
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPinAction", into = "RawPinAction")]
pub struct PinAction {
    /// Requested mutation.
    pub kind: PinActionKind,
    /// When the action was issued, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl PinAction {
    /// Build an action with an explicit timestamp.
    #[must_use]
    pub const fn new(kind: PinActionKind, timestamp: i64) -> Self {
        Self { kind, timestamp }
    }

    /// Build an action stamped with the current time.
    #[must_use]
    pub fn now(kind: PinActionKind) -> Self {
        Self::new(kind, now_millis())
    }

    /// Wire name of the action kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Untyped action as exchanged with the UI layer or read from an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPinAction {
    /// Action kind, e.g. `SET_PENDING_PIN`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub payload: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// `DELETE_PIN` accepts either a bare id or a pin-shaped object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PinRef {
    Id(PinId),
    Pin { id: PinId },
}

impl TryFrom<RawPinAction> for PinAction {
    type Error = StateError;

    fn try_from(raw: RawPinAction) -> Result<Self, Self::Error> {
        let RawPinAction {
            kind,
            payload,
            timestamp,
        } = raw;
        let decoded = match kind.as_str() {
            SET_PENDING_PIN => decode(&kind, payload).map(PinActionKind::SetPendingPin),
            UPDATE_PENDING_PIN => decode(&kind, payload).map(PinActionKind::UpdatePendingPin),
            FINALIZE_PENDING_PIN => {
                decode(&kind, payload).map(PinActionKind::FinalizePendingPin)
            }
            CLEAR_PENDING_PIN => Ok(PinActionKind::ClearPendingPin),
            DELETE_PIN => decode(&kind, payload).map(|target| match target {
                PinRef::Id(id) | PinRef::Pin { id } => PinActionKind::DeletePin(id),
            }),
            _ => Err(StateError::InvalidDispatch {
                kind: kind.clone(),
                reason: "unknown action kind".to_owned(),
            }),
        }?;
        Ok(Self::new(decoded, timestamp))
    }
}

fn decode<T: serde::de::DeserializeOwned>(kind: &str, payload: Value) -> Result<T, StateError> {
    // Patches may legitimately be omitted; treat a missing payload as `{}`.
    let normalised = if payload.is_null() && kind != SET_PENDING_PIN && kind != DELETE_PIN {
        Value::Object(serde_json::Map::new())
    } else {
        payload
    };
    serde_json::from_value(normalised).map_err(|err| StateError::InvalidDispatch {
        kind: kind.to_owned(),
        reason: format!("malformed payload: {err}"),
    })
}

impl From<PinAction> for RawPinAction {
    fn from(action: PinAction) -> Self {
        let kind = action.name().to_owned();
        let payload = match action.kind {
            PinActionKind::SetPendingPin(coordinates) => {
                serde_json::to_value(coordinates).unwrap_or_default()
            }
            PinActionKind::UpdatePendingPin(patch) | PinActionKind::FinalizePendingPin(patch) => {
                serde_json::to_value(patch).unwrap_or_default()
            }
            PinActionKind::ClearPendingPin => Value::Null,
            PinActionKind::DeletePin(id) => Value::String(id.as_str().to_owned()),
        };
        Self {
            kind,
            payload,
            timestamp: action.timestamp,
        }
    }
}

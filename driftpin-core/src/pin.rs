//! Pin annotations and the reserved pending-pin slot.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Coordinates;

/// Identifier reserved for the pending pin when it is rendered alongside
/// finalised pins. Never assigned to a finalised pin.
pub const PENDING_PIN_ID: &str = "pending-pin";

/// Emoji given to a freshly placed pending pin.
pub const DEFAULT_PIN_EMOJI: &str = "📍";

/// Unique identifier of a finalised pin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The sentinel identifier used to render the pending pin.
    #[must_use]
    pub fn pending() -> Self {
        Self(PENDING_PIN_ID.to_owned())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved pending-pin identifier.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0 == PENDING_PIN_ID
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PinId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PinId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A finalised map annotation.
///
/// Fields the application does not model explicitly survive in `extra` and
/// are flattened back into the object on serialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique identifier.
    pub id: PinId,
    /// Where the pin sits on the map.
    pub coordinates: Coordinates,
    /// Marker glyph.
    pub emoji: String,
    /// Free-form note.
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Extension fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The single not-yet-finalised pin awaiting user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPin {
    /// Where the pin sits on the map.
    pub coordinates: Coordinates,
    /// Marker glyph.
    pub emoji: String,
    /// Free-form note.
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Extension fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PendingPin {
    /// A blank pending pin dropped at `coordinates`.
    #[must_use]
    pub fn at(coordinates: Coordinates, timestamp: i64) -> Self {
        Self {
            coordinates,
            emoji: DEFAULT_PIN_EMOJI.to_owned(),
            message: String::new(),
            timestamp,
            extra: Map::new(),
        }
    }

    /// Merge the fields present in `patch` into this pin.
    pub fn apply(&mut self, patch: &PinPatch) {
        if let Some(coordinates) = patch.coordinates {
            self.coordinates = coordinates;
        }
        if let Some(emoji) = &patch.emoji {
            self.emoji.clone_from(emoji);
        }
        if let Some(message) = &patch.message {
            self.message.clone_from(message);
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        for (key, value) in &patch.extra {
            // Identity is owned by the store, never by a patch.
            if key != "id" {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }

    /// Promote the pending pin into a finalised [`Pin`] with identity `id`.
    #[must_use]
    pub fn finalize(self, id: PinId) -> Pin {
        Pin {
            id,
            coordinates: self.coordinates,
            emoji: self.emoji,
            message: self.message,
            timestamp: self.timestamp,
            extra: self.extra,
        }
    }

    /// Render the pending pin as a [`Pin`] carrying [`PENDING_PIN_ID`].
    #[must_use]
    pub fn to_pin(&self) -> Pin {
        self.clone().finalize(PinId::pending())
    }
}

/// Partial update applied to the pending pin.
///
/// Absent fields leave the pin untouched. Unknown keys are kept as extension
/// fields, except `id`, which the store always assigns itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinPatch {
    /// Replacement position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Replacement glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Replacement note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Replacement timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Extension fields to merge.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PinPatch {
    /// A patch setting the glyph and note, as submitted by the pin form.
    #[must_use]
    pub fn with_content(emoji: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            emoji: Some(emoji.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

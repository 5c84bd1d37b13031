use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Length of an entity identifier in hex characters (12 bytes).
pub const ENTITY_ID_LEN: usize = 24;

/// Opaque, fixed-length hex identifier shared by every collection.
///
/// Compatible with document-store object ids: exactly 24 hex digits, stored
/// lowercase. Malformed input never produces an `EntityId`; callers treat a
/// failed parse as "not found".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse a raw identifier. Returns `None` unless `raw` is exactly
    /// [`ENTITY_ID_LEN`] hex digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == ENTITY_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Generate a fresh, time-ordered identifier.
    ///
    /// Takes the 48-bit timestamp prefix and the last six random bytes of a
    /// UUIDv7, so ids sort roughly by creation time.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::now_v7();
        let bytes = uuid.as_bytes();
        let mut out = String::with_capacity(ENTITY_ID_LEN);
        for b in bytes[..6].iter().chain(&bytes[10..]) {
            out.push_str(&format!("{b:02x}"));
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid identifier '{raw}'"))
        })
    }
}

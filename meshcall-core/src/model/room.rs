use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{Uuid, Variant};

/// Grouping key for participants. Any string can be joined; only canonical
/// v4 UUIDs are advertised in room listings.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical hyphenated form, version 4, RFC 4122 variant.
    pub fn is_discoverable(&self) -> bool {
        if self.0.len() != 36 {
            return false;
        }

        match Uuid::try_parse(&self.0) {
            Ok(id) => id.get_version_num() == 4 && id.get_variant() == Variant::RFC4122,
            Err(_) => false,
        }
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

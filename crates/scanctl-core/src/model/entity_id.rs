// ── Core identity type ──
//
// The daemon hands out UUIDs for persistent entities, but some nested
// references (trashcan entries, imports from older installations) carry
// opaque ids. EntityId unifies both behind a single ergonomic interface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Canonical identifier for any scan manager entity.
///
/// Transparently wraps either a UUID or an opaque wire string. Consumers
/// never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Opaque(String),
}

impl EntityId {
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&str> {
        match self {
            Self::Opaque(s) => Some(s),
            Self::Uuid(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Opaque(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Opaque(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_uuid_string() {
        let id = EntityId::from("254cd3ef-bbe1-4d58-859d-21b8d0c046c6".to_owned());
        assert!(id.as_uuid().is_some());
    }

    #[test]
    fn entity_id_from_opaque_string() {
        let id = EntityId::from("trash:1234".to_owned());
        assert!(id.as_opaque().is_some());
    }

    #[test]
    fn entity_id_display_round_trips() {
        let id: EntityId = "254cd3ef-bbe1-4d58-859d-21b8d0c046c6".parse().unwrap();
        assert_eq!(id.to_string(), "254cd3ef-bbe1-4d58-859d-21b8d0c046c6");
    }
}

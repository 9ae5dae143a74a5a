// ── Shared entity base fields ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scanctl_api::elements::BaseElement;

use super::entity_id::EntityId;
use super::parse::{parse_datetime, parse_yes_no, YesNo};

/// Fields every entity shares, parsed from the element's base members.
///
/// Tri-state flags apply the conventional defaults when the wire omits
/// them: entities are writable and active unless the daemon says
/// otherwise, and not in use, orphaned, or trashed unless flagged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub comment: Option<String>,
    /// Owner's login name.
    pub owner: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub modification_time: Option<DateTime<Utc>>,
    pub writable: YesNo,
    pub in_use: YesNo,
    pub orphan: YesNo,
    pub active: YesNo,
    pub trash: YesNo,
}

impl EntityInfo {
    pub fn from_element(base: &BaseElement) -> Self {
        Self {
            id: base
                .id
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(EntityId::from),
            name: base.name.clone(),
            comment: base.comment.clone().filter(|s| !s.is_empty()),
            owner: base.owner.as_ref().and_then(|o| o.name.clone()),
            creation_time: parse_datetime(base.creation_time.as_deref()),
            modification_time: parse_datetime(base.modification_time.as_deref()),
            writable: parse_yes_no(base.writable.as_deref()).unwrap_or(YesNo::Yes),
            in_use: parse_yes_no(base.in_use.as_deref()).unwrap_or(YesNo::No),
            orphan: parse_yes_no(base.orphan.as_deref()).unwrap_or(YesNo::No),
            active: parse_yes_no(base.active.as_deref()).unwrap_or(YesNo::Yes),
            trash: parse_yes_no(base.trash.as_deref()).unwrap_or(YesNo::No),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writable.is_yes()
    }

    pub fn is_in_use(&self) -> bool {
        self.in_use.is_yes()
    }
}

impl Default for EntityInfo {
    fn default() -> Self {
        Self::from_element(&BaseElement::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_override_defaults() {
        let base = BaseElement {
            writable: Some("0".into()),
            orphan: Some("1".into()),
            ..BaseElement::default()
        };
        let info = EntityInfo::from_element(&base);
        assert_eq!(info.writable, YesNo::No);
        assert_eq!(info.orphan, YesNo::Yes);
    }

    #[test]
    fn missing_flags_take_model_defaults() {
        let info = EntityInfo::from_element(&BaseElement::default());
        assert_eq!(info.writable, YesNo::Yes);
        assert_eq!(info.active, YesNo::Yes);
        assert_eq!(info.in_use, YesNo::No);
        assert_eq!(info.orphan, YesNo::No);
        assert_eq!(info.trash, YesNo::No);
    }

    #[test]
    fn empty_id_is_absent() {
        let base = BaseElement {
            id: Some(String::new()),
            ..BaseElement::default()
        };
        assert!(EntityInfo::from_element(&base).id.is_none());
    }

    #[test]
    fn owner_lifts_login_name() {
        let base = BaseElement {
            owner: Some(scanctl_api::elements::OwnerElement {
                name: Some("admin".into()),
            }),
            ..BaseElement::default()
        };
        assert_eq!(
            EntityInfo::from_element(&base).owner.as_deref(),
            Some("admin")
        );
    }
}

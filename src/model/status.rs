//! Item status and link status
//!
//! Both enums are stored and serialized as their snake_case wire names.
//! Status parsing is context dependent: a new item may only start as
//! `not_started`, while an update may move it to any state.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Progress state of a modification item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    NotStarted,
    InProgress,
    Responded,
    Done,
}

impl ItemStatus {
    /// Every variant, in workflow order
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::NotStarted,
        ItemStatus::InProgress,
        ItemStatus::Responded,
        ItemStatus::Done,
    ];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::NotStarted => "not_started",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::Responded => "responded",
            ItemStatus::Done => "done",
        }
    }

    /// Parse a status supplied when creating an item.
    ///
    /// Only `not_started` is admitted.
    pub fn parse_for_create(s: &str) -> Option<Self> {
        match s.parse() {
            Ok(ItemStatus::NotStarted) => Some(ItemStatus::NotStarted),
            _ => None,
        }
    }

    /// Parse a status supplied when updating an item. All variants are admitted.
    pub fn parse_for_update(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl FromStr for ItemStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whether an item has been associated with an issue-tracker entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkStatus {
    #[default]
    Unlinked,
    Linked,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Unlinked => "unlinked",
            LinkStatus::Linked => "linked",
        }
    }
}

impl FromStr for LinkStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unlinked" => Ok(LinkStatus::Unlinked),
            "linked" => Ok(LinkStatus::Linked),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LinkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A stored or supplied value that names no known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0:?}")]
pub struct UnknownVariant(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_admits_only_not_started() {
        assert_eq!(
            ItemStatus::parse_for_create("not_started"),
            Some(ItemStatus::NotStarted)
        );
        for s in ["in_progress", "responded", "done", "", "NOT_STARTED"] {
            assert_eq!(ItemStatus::parse_for_create(s), None, "{s}");
        }
    }

    #[test]
    fn test_update_admits_all_variants() {
        for status in ItemStatus::ALL {
            assert_eq!(ItemStatus::parse_for_update(status.as_str()), Some(status));
        }
        assert_eq!(ItemStatus::parse_for_update("finished"), None);
    }

    #[test]
    fn test_link_status_round_trip() {
        assert_eq!("linked".parse::<LinkStatus>(), Ok(LinkStatus::Linked));
        assert_eq!("unlinked".parse::<LinkStatus>(), Ok(LinkStatus::Unlinked));
        assert!("pending".parse::<LinkStatus>().is_err());
        assert_eq!(LinkStatus::default(), LinkStatus::Unlinked);
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&ItemStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let json = serde_json::to_string(&LinkStatus::Linked).unwrap();
        assert_eq!(json, "\"linked\"");
    }
}

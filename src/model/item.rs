//! Modification item entity and request payloads

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::deadline::Deadline;
use super::status::{ItemStatus, LinkStatus};

/// A tracked change request
///
/// `status` and `link_status` are `None` only for rows read with the
/// restricted sync column set; they serialize as empty strings then.
/// Empty `issue_number` and `details` are omitted from the JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModificationItem {
    pub id: u64,
    pub title: String,
    #[serde(serialize_with = "display_or_empty")]
    pub status: Option<ItemStatus>,
    pub deadline: Deadline,
    #[serde(serialize_with = "display_or_empty")]
    pub link_status: Option<LinkStatus>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub issue_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
}

impl ModificationItem {
    /// Item as reported back to the caller after a write.
    ///
    /// Link fields always take their unlinked defaults; they are not read
    /// back from the store.
    pub fn from_fields(id: u64, fields: ItemFields) -> Self {
        Self {
            id,
            title: fields.title,
            status: Some(fields.status),
            deadline: fields.deadline,
            link_status: Some(LinkStatus::Unlinked),
            issue_number: String::new(),
            details: fields.details.unwrap_or_default(),
        }
    }
}

fn display_or_empty<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(""),
    }
}

/// Body of create and update requests
///
/// Every key is optional at the decode step; absent or null keys become
/// empty strings so that validation can report them as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemPayload {
    pub title: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub details: Option<String>,
}

/// Validated create/update input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    pub status: ItemStatus,
    pub deadline: Deadline,
    /// `None` when the caller sent no details or an empty string
    pub details: Option<String>,
}

/// Why a payload failed validation, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid status value")]
    InvalidStatus,
    #[error("Invalid deadline format. Use YYYY-MM-DD.")]
    InvalidDeadline,
}

/// Which status values a payload may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// New items start as `not_started`
    Create,
    /// Any status
    Update,
}

impl StatusPolicy {
    fn parse(self, s: &str) -> Option<ItemStatus> {
        match self {
            StatusPolicy::Create => ItemStatus::parse_for_create(s),
            StatusPolicy::Update => ItemStatus::parse_for_update(s),
        }
    }
}

impl ItemPayload {
    /// Check required fields, then status, then deadline.
    pub fn validate(self, policy: StatusPolicy) -> Result<ItemFields, ValidationError> {
        let title = self.title.unwrap_or_default();
        let status = self.status.unwrap_or_default();
        let deadline = self.deadline.unwrap_or_default();

        if title.is_empty() || status.is_empty() || deadline.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let status = policy
            .parse(&status)
            .ok_or(ValidationError::InvalidStatus)?;

        let deadline: Deadline = deadline
            .parse()
            .map_err(|_| ValidationError::InvalidDeadline)?;

        Ok(ItemFields {
            title,
            status,
            deadline,
            details: self.details.filter(|d| !d.is_empty()),
        })
    }
}

/// Body of a mark-linked request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarkLinkedRequest {
    pub id: u64,
    pub issue_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(title: &str, status: &str, deadline: &str) -> ItemPayload {
        ItemPayload {
            title: Some(title.to_string()),
            status: Some(status.to_string()),
            deadline: Some(deadline.to_string()),
            details: None,
        }
    }

    #[test]
    fn test_validation_order() {
        // Missing fields win over a bad status
        let err = payload("", "bogus", "nope").validate(StatusPolicy::Create);
        assert_eq!(err, Err(ValidationError::MissingFields));

        // Bad status wins over a bad deadline
        let err = payload("t", "done", "nope").validate(StatusPolicy::Create);
        assert_eq!(err, Err(ValidationError::InvalidStatus));

        let err = payload("t", "done", "nope").validate(StatusPolicy::Update);
        assert_eq!(err, Err(ValidationError::InvalidDeadline));
    }

    #[test]
    fn test_absent_keys_are_missing_fields() {
        let p: ItemPayload = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert_eq!(p.validate(StatusPolicy::Create), Err(ValidationError::MissingFields));

        let p: ItemPayload = serde_json::from_value(json!({
            "title": null,
            "status": "not_started",
            "deadline": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(p.validate(StatusPolicy::Create), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_wrong_field_type_fails_decode() {
        let p = serde_json::from_value::<ItemPayload>(json!({"title": 5}));
        assert!(p.is_err());
    }

    #[test]
    fn test_empty_details_become_none() {
        let mut p = payload("t", "not_started", "2024-01-01");
        p.details = Some(String::new());
        let fields = p.validate(StatusPolicy::Create).unwrap();
        assert_eq!(fields.details, None);
    }

    #[test]
    fn test_created_item_shape() {
        let fields = payload("Fix header", "not_started", "2024-05-01")
            .validate(StatusPolicy::Create)
            .unwrap();
        let item = ModificationItem::from_fields(7, fields);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Fix header",
                "status": "not_started",
                "deadline": "2024-05-01",
                "link_status": "unlinked"
            })
        );
    }

    #[test]
    fn test_missing_statuses_serialize_empty() {
        let item = ModificationItem {
            id: 1,
            title: "t".to_string(),
            status: None,
            deadline: "2024-01-01".parse().unwrap(),
            link_status: None,
            issue_number: String::new(),
            details: "d".to_string(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["status"], "");
        assert_eq!(value["link_status"], "");
        assert_eq!(value["details"], "d");
        assert!(value.get("issue_number").is_none());
    }

    #[test]
    fn test_mark_linked_defaults() {
        let req: MarkLinkedRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.id, 0);
        assert_eq!(req.issue_number, None);

        assert!(serde_json::from_value::<MarkLinkedRequest>(json!({"id": -1})).is_err());
    }
}

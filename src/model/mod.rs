//! Domain model for modification items
//!
//! The item entity, its closed status enums, the validated deadline type and
//! the request payloads accepted by the REST layer.

mod deadline;
mod item;
mod status;

pub use deadline::{Deadline, InvalidDeadline};
pub use item::{
    ItemFields, ItemPayload, MarkLinkedRequest, ModificationItem, StatusPolicy, ValidationError,
};
pub use status::{ItemStatus, LinkStatus, UnknownVariant};

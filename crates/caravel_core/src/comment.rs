//! Comment resource records.

use crate::{Attachment, Resource};
use serde::{Deserialize, Serialize};

/// A comment pulled from the source system.
///
/// References its video and author by source id; both must resolve through
/// the identity mapping before the comment can be created remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Comment {
    /// Stable source id
    pub id: String,
    /// Source id of the commented video
    pub video: String,
    /// Source id of the authoring profile
    pub profile: String,
    /// Comment body
    pub comment: String,
    /// Source record schema version
    pub schema: i64,
    /// Last modification timestamp, epoch milliseconds
    pub last_modified: i64,
    /// Optional binary attachment
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl Resource for Comment {
    const KIND: &'static str = "comment";

    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> i64 {
        self.last_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_is_optional_on_wire_records() {
        let raw = serde_json::json!({
            "id": "c1",
            "video": "v1",
            "profile": "p1",
            "comment": "Bravo !",
            "schema": 1,
            "last_modified": 5
        });
        let c: Comment = serde_json::from_value(raw).unwrap();
        assert!(c.attachment.is_none());
        assert_eq!(c.order_key(), 5);
    }
}

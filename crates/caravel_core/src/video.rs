//! Video resource records.

use crate::{Attachment, Resource};
use serde::{Deserialize, Serialize};

/// A video pulled from the source system.
///
/// Field names match the source wire format so persisted records stay
/// resumption-compatible with earlier runs. `quarantine` is not a source
/// field: it is set at pull time for videos coming from the upcoming
/// (unpublished) collection and such videos must stay held on the
/// destination until explicitly released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Video {
    /// Stable source id
    pub id: String,
    /// Display title
    pub title: String,
    /// Free-form description; may be empty
    pub description: String,
    /// Duration in seconds
    pub duration: i64,
    /// Grade label, possibly compound (e.g. `"CP et CE1"`)
    pub grade: String,
    /// Keyword tags
    pub keywords: Vec<String>,
    /// Source id of the owning profile
    pub profile: String,
    /// Creation timestamp, epoch milliseconds
    pub creation_date: i64,
    /// Publication timestamp, epoch milliseconds; zero when unpublished
    pub publish_date: i64,
    /// Last modification timestamp, epoch milliseconds
    pub last_modified: i64,
    /// Source record schema version
    pub schema: i64,
    /// Thumbnail URL; may be empty
    pub thumbnail: String,
    /// Primary media payload
    pub attachment: Attachment,
    /// Pulled from the upcoming collection; must stay held on the destination
    #[serde(default)]
    pub quarantine: bool,
}

impl Video {
    /// Filename under which the normalized thumbnail is uploaded.
    pub fn thumbnail_filename(&self) -> String {
        format!("{}.jpeg", self.id)
    }

    /// Destination tags: grade labels followed by keywords, capped at five
    /// entries of at most thirty characters (destination-imposed limits).
    /// Empty entries are dropped; an empty grade yields no grade tag.
    pub fn tags(&self) -> Vec<String> {
        self.grade
            .split(" et ")
            .map(str::to_string)
            .chain(self.keywords.iter().cloned())
            .filter(|tag| !tag.is_empty())
            .take(5)
            .map(|tag| tag.chars().take(30).collect())
            .collect()
    }
}

impl Resource for Video {
    const KIND: &'static str = "video";

    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> i64 {
        self.publish_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(grade: &str, keywords: &[&str]) -> Video {
        Video {
            id: "vid1".to_string(),
            title: "Une journée en classe".to_string(),
            description: String::new(),
            duration: 90,
            grade: grade.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            profile: "prof1".to_string(),
            creation_date: 1,
            publish_date: 2,
            last_modified: 3,
            schema: 1,
            thumbnail: String::new(),
            attachment: Attachment {
                filename: "video.mp4".to_string(),
                hash: "deadbeef".to_string(),
                location: "https://example.org/video.mp4".to_string(),
                mimetype: "video/mp4".to_string(),
                size: 1,
            },
            quarantine: false,
        }
    }

    #[test]
    fn tags_split_compound_grade_then_keywords() {
        let v = video("CP et CE1", &["lecture", "sortie"]);
        assert_eq!(v.tags(), vec!["CP", "CE1", "lecture", "sortie"]);
    }

    #[test]
    fn tags_capped_at_five() {
        let v = video("CP et CE1", &["a", "b", "c", "d"]);
        assert_eq!(v.tags().len(), 5);
    }

    #[test]
    fn empty_grade_yields_no_grade_tag() {
        let v = video("", &["lecture"]);
        assert_eq!(v.tags(), vec!["lecture"]);
        assert!(video("", &[]).tags().is_empty());
    }

    #[test]
    fn tags_truncated_to_thirty_chars() {
        let long = "x".repeat(40);
        let v = video(&long, &[]);
        assert_eq!(v.tags()[0].len(), 30);
    }

    #[test]
    fn quarantine_defaults_to_false_on_wire_records() {
        let raw = serde_json::json!({
            "id": "vid1",
            "title": "t",
            "description": "",
            "duration": 1,
            "grade": "CP",
            "keywords": [],
            "profile": "p",
            "creation_date": 0,
            "publish_date": 0,
            "last_modified": 0,
            "schema": 1,
            "thumbnail": "",
            "attachment": {
                "filename": "f",
                "hash": "h",
                "location": "l",
                "mimetype": "video/mp4",
                "size": 1
            }
        });
        let v: Video = serde_json::from_value(raw).unwrap();
        assert!(!v.quarantine);
    }

    #[test]
    fn unknown_wire_fields_are_rejected() {
        let raw = serde_json::json!({"id": "vid1", "unexpected": true});
        assert!(serde_json::from_value::<Video>(raw).is_err());
    }
}

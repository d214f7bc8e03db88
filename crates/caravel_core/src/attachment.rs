//! Binary attachment metadata.

use serde::{Deserialize, Serialize};

/// A binary payload owned by exactly one resource.
///
/// The `hash` field is the content hash of the payload and serves as its
/// identity: the local cache stores the bytes under the hash, so two
/// resources carrying byte-identical attachments share one cached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original filename as recorded by the source system
    pub filename: String,
    /// Content hash of the payload; the cache key
    pub hash: String,
    /// URL the payload can be downloaded from
    pub location: String,
    /// MIME type of the payload
    pub mimetype: String,
    /// Payload size in bytes
    pub size: u64,
}

impl Attachment {
    /// Filename derived from the last segment of the source location.
    ///
    /// Used as the terminal path component when re-uploading the payload to
    /// the asset store.
    pub fn location_filename(&self) -> &str {
        self.location.rsplit('/').next().unwrap_or(&self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(location: &str) -> Attachment {
        Attachment {
            filename: "photo.jpg".to_string(),
            hash: "abc123".to_string(),
            location: location.to_string(),
            mimetype: "image/jpeg".to_string(),
            size: 42,
        }
    }

    #[test]
    fn location_filename_takes_last_segment() {
        let a = attachment("https://files.example.org/bucket/photo%20de%20classe.jpg");
        assert_eq!(a.location_filename(), "photo%20de%20classe.jpg");
    }

    #[test]
    fn location_filename_without_slashes_is_whole_location() {
        let a = attachment("photo.jpg");
        assert_eq!(a.location_filename(), "photo.jpg");
    }
}

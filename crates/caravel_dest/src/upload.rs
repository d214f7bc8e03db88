//! Multipart video upload payload.

use chrono::DateTime;
use std::path::PathBuf;

/// Everything the destination upload endpoint needs for one video.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    /// Video title
    pub name: String,
    /// Target channel of the uploading actor
    pub channel_id: i64,
    /// Description; the destination rejects empty ones
    pub description: String,
    /// Destination privacy level
    pub privacy: u8,
    /// Destination category id
    pub category: u8,
    /// Tags, already capped to destination limits
    pub tags: Vec<String>,
    /// Original publication timestamp, epoch milliseconds; zero when unset
    pub publish_date: i64,
    /// Cached media payload
    pub video_path: PathBuf,
    /// Filename to declare for the media payload
    pub video_filename: String,
    /// MIME type of the media payload
    pub video_mimetype: String,
    /// Cached normalized thumbnail, sent as both preview and thumbnail
    pub thumbnail: Option<ThumbnailUpload>,
}

/// Cached thumbnail file and its upload name.
#[derive(Debug, Clone)]
pub struct ThumbnailUpload {
    /// Path of the normalized JPEG in the local cache
    pub path: PathBuf,
    /// Filename to declare on upload
    pub filename: String,
}

impl VideoUpload {
    /// RFC 3339 rendering of the publish date, when one is set.
    pub fn originally_published_at(&self) -> Option<String> {
        if self.publish_date == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.publish_date).map(|dt| dt.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(publish_date: i64) -> VideoUpload {
        VideoUpload {
            name: "t".to_string(),
            channel_id: 1,
            description: "t".to_string(),
            privacy: 1,
            category: 13,
            tags: vec![],
            publish_date,
            video_path: PathBuf::from("/tmp/x"),
            video_filename: "x.mp4".to_string(),
            video_mimetype: "video/mp4".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn zero_publish_date_omits_publication_field() {
        assert!(upload(0).originally_published_at().is_none());
    }

    #[test]
    fn publish_date_renders_rfc3339() {
        let rendered = upload(1_546_300_800_000).originally_published_at().unwrap();
        assert!(rendered.starts_with("2019-01-01T00:00:00"));
    }
}

//! On-disk, content-addressed cache of pulled resources.

use caravel_core::{Attachment, Resource, Video};
use caravel_error::{CaravelResult, HttpError, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const META_SUFFIX: &str = "-meta";
const THUMBNAIL_SUFFIX: &str = "-thumbnail";
const JPEG_QUALITY: u8 = 95;

/// Filesystem cache of pulled resource records and their binary attachments.
///
/// Layout:
///
/// ```text
/// {root}/
/// ├── video/
/// │   ├── {id}-meta         (JSON record)
/// │   └── {id}-thumbnail    (normalized JPEG)
/// ├── profile/
/// │   └── {id}-meta
/// ├── comment/
/// │   └── {id}-meta
/// └── attachment/
///     └── {hash}            (payload, content-addressed)
/// ```
///
/// Records are written at most once per id unless a re-pull is forced;
/// attachments are keyed by content hash so byte-identical payloads share one
/// cached file.
pub struct ResourceStore {
    root: PathBuf,
    client: reqwest::Client,
}

impl ResourceStore {
    /// Open the store at `root`, creating the directory if absent.
    pub fn new(root: impl Into<PathBuf>) -> CaravelResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;
        debug!(path = %root.display(), "Opened resource store");
        Ok(Self {
            root,
            client: reqwest::Client::new(),
        })
    }

    fn kind_root(&self, kind: &str) -> CaravelResult<PathBuf> {
        let dir = self.root.join(kind);
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        Ok(dir)
    }

    /// Path of the record file for a resource id of kind `R`.
    pub fn record_path<R: Resource>(&self, id: &str) -> PathBuf {
        self.root.join(R::KIND).join(format!("{id}{META_SUFFIX}"))
    }

    /// Persist a resource record if absent or `force`.
    ///
    /// Returns `true` when the record was written, `false` when the cached
    /// copy was kept.
    pub fn put<R: Resource>(&self, resource: &R, force: bool) -> CaravelResult<bool> {
        self.kind_root(R::KIND)?;
        let dest = self.record_path::<R>(resource.id());
        if dest.exists() && !force {
            debug!(kind = R::KIND, id = resource.id(), "Record already cached");
            return Ok(false);
        }
        let body = serde_json::to_vec(resource).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                dest.display(),
                e
            )))
        })?;
        write_atomic(&dest, &body, false)?;
        info!(kind = R::KIND, id = resource.id(), "Persisted record");
        Ok(true)
    }

    /// Lazily iterate all persisted records of kind `R`, in no particular
    /// order.
    pub fn list<R: Resource>(&self) -> CaravelResult<RecordIter<R>> {
        let dir = self.kind_root(R::KIND)?;
        let entries = fs::read_dir(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        Ok(RecordIter {
            entries,
            _marker: PhantomData,
        })
    }

    /// Cache path of an attachment payload, keyed by content hash.
    pub fn attachment_path(&self, attachment: &Attachment) -> PathBuf {
        self.root.join("attachment").join(&attachment.hash)
    }

    /// Download an attachment payload into the cache if absent or `force`.
    ///
    /// Failure here is fatal for the owning resource's pull: a resource
    /// without its primary payload cannot be migrated.
    pub async fn download_attachment(
        &self,
        attachment: &Attachment,
        force: bool,
    ) -> CaravelResult<bool> {
        self.kind_root("attachment")?;
        let dest = self.attachment_path(attachment);
        if dest.exists() && !force {
            debug!(hash = %attachment.hash, "Attachment already cached");
            return Ok(false);
        }
        info!(url = %attachment.location, hash = %attachment.hash, "Downloading attachment");
        let bytes = self.fetch(&attachment.location).await?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = format!("{:x}", hasher.finalize());
        if digest != attachment.hash {
            // The source hash is authoritative as the cache key; a differing
            // digest is logged for the operator but does not block the pull.
            warn!(
                declared = %attachment.hash,
                computed = %digest,
                url = %attachment.location,
                "Attachment content does not match its declared hash"
            );
        }
        write_atomic(&dest, &bytes, false)?;
        Ok(true)
    }

    /// Cache path of a video's normalized thumbnail.
    pub fn thumbnail_path(&self, video_id: &str) -> PathBuf {
        self.root
            .join(Video::KIND)
            .join(format!("{video_id}{THUMBNAIL_SUFFIX}"))
    }

    /// Download a video's thumbnail if present, absent or `force`, and
    /// normalize it to the one image encoding the destination accepts.
    ///
    /// Network failure is tolerated: the video migrates without a thumbnail.
    pub async fn download_thumbnail(&self, video: &Video, force: bool) -> CaravelResult<bool> {
        if video.thumbnail.is_empty() {
            return Ok(false);
        }
        self.kind_root(Video::KIND)?;
        let dest = self.thumbnail_path(&video.id);
        if dest.exists() && !force {
            debug!(id = %video.id, "Thumbnail already cached");
            return Ok(false);
        }
        let bytes = match self.fetch(&video.thumbnail).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = %video.id, url = %video.thumbnail, error = %e, "Thumbnail fetch failed, continuing without it");
                return Ok(false);
            }
        };
        let jpeg = normalize_to_jpeg(&bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::Image(format!(
                "thumbnail for {}: {}",
                video.id, e
            )))
        })?;
        write_atomic(&dest, &jpeg, false)?;
        info!(id = %video.id, "Stored normalized thumbnail");
        Ok(true)
    }

    async fn fetch(&self, url: &str) -> CaravelResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(HttpError::new(format!(
                "GET {url} returned {}",
                response.status()
            ))
            .into());
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Lazy iterator over the persisted records of one resource kind.
pub struct RecordIter<R> {
    entries: fs::ReadDir,
    _marker: PhantomData<R>,
}

impl<R: Resource> Iterator for RecordIter<R> {
    type Item = CaravelResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(StorageError::new(StorageErrorKind::FileRead(
                        e.to_string(),
                    ))
                    .into()));
                }
            };
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(META_SUFFIX) {
                continue;
            }
            return Some(read_record(&path));
        }
    }
}

fn read_record<R: Resource>(path: &Path) -> CaravelResult<R> {
    let body = fs::read(path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    serde_json::from_slice(&body).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidRecord(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}

/// Re-encode arbitrary image bytes as an RGB JPEG.
fn normalize_to_jpeg(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();
    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(out)
}

/// Write via temp file + rename so readers never observe a torn file.
pub(crate) fn write_atomic(path: &Path, body: &[u8], fsync: bool) -> CaravelResult<()> {
    let tmp = path.with_extension("tmp");
    let write = || -> std::io::Result<()> {
        fs::write(&tmp, body)?;
        if fsync {
            let file = fs::File::open(&tmp)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)
    };
    write().map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}

//! The trait tying resource records to the local cache layout.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed migratable entity persisted under a per-kind root in the local
/// resource store, one record file per source id.
///
/// Records are immutable once pulled; a forced re-pull replaces the whole
/// record file.
pub trait Resource: Serialize + DeserializeOwned {
    /// Directory name under the cache root (e.g. `video`, `profile`).
    const KIND: &'static str;

    /// Stable source-system identifier.
    fn id(&self) -> &str;

    /// Canonical push-order key. Records are pushed in non-decreasing key
    /// order so retries regenerate the same work order.
    fn order_key(&self) -> i64;
}

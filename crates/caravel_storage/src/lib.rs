//! Local resource cache and identity mapping store for Caravel.
//!
//! This crate owns all persisted migration state:
//!
//! - **Resource store**: one JSON record file per source id under a per-kind
//!   root, plus a content-addressed attachment cache keyed by hash for
//!   automatic deduplication. The unit of resumability for the pull phase.
//! - **Mapping store**: a durable source-id → destination-id table scoped by
//!   destination endpoint. The unit of idempotency for the push phase.
//! - **Ownership table**: the auxiliary video-id → username mapping produced
//!   by the offline ownership resolver.
//!
//! All writes go through temp-file + rename for atomicity; the mapping store
//! additionally fsyncs before returning so a crash loses at most the
//! in-flight item.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mapping;
mod ownership;
mod store;

pub use caravel_error::{StorageError, StorageErrorKind};
pub use mapping::MappingStore;
pub use ownership::OwnershipTable;
pub use store::{RecordIter, ResourceStore};

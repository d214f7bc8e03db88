//! Migration pipelines.
//!
//! Three strictly sequential pipelines over the local resource store:
//!
//! - **Pull**: fetch resource collections from the source system and
//!   materialize them locally, downloading attachments into the
//!   content-addressed cache.
//! - **Push**: read the store in dependency order (profiles → videos →
//!   comments), create each resource on the destination exactly once per
//!   source id, and record the identity mapping durably after every
//!   successful creation.
//! - **Ownership resolution**: reconcile a spreadsheet of video owners
//!   against pulled titles and profiles into the auxiliary ownership table.
//!
//! One resource is in flight at a time; resumability comes from the
//! idempotency checks, not from transactions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ownership;
mod pull;
mod push;

pub use ownership::{OwnershipReport, resolve_ownership};
pub use pull::PullPipeline;
pub use push::{PushOptions, PushPipeline, ordered_records};

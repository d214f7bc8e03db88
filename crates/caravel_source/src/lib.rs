//! Read-only client for the source content-management API.
//!
//! The source system exposes bucket/collection record listings and an
//! account listing, authenticated with static basic-auth credentials. This
//! crate only reads; all migration state lives in `caravel_storage`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;

pub use client::{Account, SourceClient, SourceConfig};

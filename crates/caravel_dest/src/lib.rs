//! Client for the destination video-hosting API and its asset store.
//!
//! The destination issues per-actor OAuth2 password-grant tokens; migrated
//! content must be created under the migrated end-user's own token so
//! authorship displays correctly. [`TokenBroker`] holds the one OAuth client
//! discovery and the per-actor token cache for the process lifetime, passed
//! explicitly into pipeline calls rather than held as global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod client;
mod token;
mod upload;

pub use asset::AssetStore;
pub use client::{DestClient, DestConfig};
pub use token::TokenBroker;
pub use upload::{ThumbnailUpload, VideoUpload};

//! Core data types for the Caravel migration tool.
//!
//! This crate provides the resource records pulled from the source system,
//! the trait that ties them to the local cache layout, and small pure helpers
//! shared by the pipelines.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod comment;
mod policy;
mod profile;
mod resource;
mod text;
mod video;

pub use attachment::Attachment;
pub use comment::Comment;
pub use policy::{ErrorPolicy, FailureAction};
pub use profile::Profile;
pub use resource::Resource;
pub use text::normalize_title;
pub use video::Video;

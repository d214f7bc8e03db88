//! Error types for the Caravel migration tool.
//!
//! This crate provides the foundation error types used throughout the Caravel
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use caravel_error::{CaravelResult, HttpError};
//!
//! fn fetch_data() -> CaravelResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod http;
mod json;
mod mapping;
mod ownership;
mod push;
mod storage;

pub use api::ApiError;
pub use config::ConfigError;
pub use error::{CaravelError, CaravelErrorKind, CaravelResult};
pub use http::HttpError;
pub use json::JsonError;
pub use mapping::{MappingError, MappingErrorKind};
pub use ownership::{OwnershipError, OwnershipErrorKind};
pub use push::DependencyError;
pub use storage::{StorageError, StorageErrorKind};

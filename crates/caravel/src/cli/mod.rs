//! Command-line interface for Caravel.
//!
//! The CLI is built with clap and exposes three families of commands:
//!
//! - `pull*` commands populate the local cache from the source API
//! - `push*` commands replay cached resources onto the destination
//! - `process-video-mapping` resolves video ownership from a spreadsheet

mod commands;
mod run;

pub use commands::{Cli, Commands, OnError, PushArgs};
pub use run::{run_ownership, run_pull, run_push};

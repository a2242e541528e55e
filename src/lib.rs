//! Core library for `atomic_mv`.
//!
//! Moves a regular file so the destination path is only ever absent or
//! complete. Same-filesystem moves use an atomic no-replace rename; moves
//! across filesystems stage a copy beside the destination and link it into
//! place once every byte is written.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use config::{Config, Durability, LogLevel};
pub use errors::{AtomicMvError, Result};
pub use fs_ops::{
    attempt_move, move_file, publish_via_copy, publish_via_copy_with, staging_path, CopyResult,
    MoveOutcome, MoveReport, PublishStage,
};

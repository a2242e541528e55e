//! Runtime configuration.
//! There is no config file and no environment lookup: every knob is a CLI
//! flag applied on top of `Config::default()`.

pub mod types;

pub use types::{Config, Durability, LogLevel};

/// Suffix appended to the destination to derive the private staging path.
pub const STAGING_SUFFIX: &str = ".part";

/// Copy buffer size when the destination filesystem reports no preferred
/// block size (matches the C library's `BUFSIZ`).
pub const FALLBACK_BUF_SIZE: usize = 8192;

//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::str::FromStr;

use super::{FALLBACK_BUF_SIZE, STAGING_SUFFIX};

/// Program-defined verbosity levels exposed to users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors (default; a successful move prints nothing)
    #[default]
    Quiet,
    /// Completed moves
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace, including every publish stage
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// How hard the cross-device path pushes data to stable storage before and
/// after publishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Durability {
    /// Leave written data in the page cache; no fsync.
    Data,
    /// fsync the staging file before the link and the destination directory after it.
    #[default]
    Full,
}

/// Runtime configuration used by the mover.
#[derive(Debug, Clone)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Emit logs as JSON lines
    pub json: bool,
    /// Appended to the destination path to form the staging path
    pub staging_suffix: String,
    /// Copy buffer size used when the filesystem does not report a block size
    pub fallback_buf_size: usize,
    /// fsync behaviour of the cross-device path
    pub durability: Durability,
    /// If true, copy the source's permission bits onto the staged file
    pub preserve_permissions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Quiet,
            json: false,
            staging_suffix: STAGING_SUFFIX.to_string(),
            fallback_buf_size: FALLBACK_BUF_SIZE,
            durability: Durability::Full,
            preserve_permissions: false,
        }
    }
}

//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Exactly two positional paths are accepted; anything else is a usage error.
//! - --debug is a shorthand for --log-level debug.

use clap::error::ErrorKind;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, Durability, LogLevel};

/// Fixed diagnostic for a wrong number of paths.
pub const USAGE_MESSAGE: &str = "provide two paths: <SOURCE> <DESTINATION>";

/// Move a file so the destination is never observed partially written.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Atomically move a file, across filesystems if needed")]
pub struct Args {
    /// Existing regular file to move.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::FilePath)]
    pub source: PathBuf,

    /// Path to create; must not exist yet.
    #[arg(value_name = "DESTINATION", value_hint = ValueHint::AnyPath)]
    pub destination: PathBuf,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Carry the source's permission bits over when the move has to copy.
    #[arg(
        long,
        help = "Keep the source's permission bits when copying across filesystems"
    )]
    pub preserve_permissions: bool,

    /// Skip fsync of the staged copy and its directory.
    #[arg(long, help = "Do not fsync the staged copy (faster, less durable)")]
    pub no_sync: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    /// Apply CLI overrides to a Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.json {
            cfg.json = true;
        }
        if self.preserve_permissions {
            cfg.preserve_permissions = true;
        }
        if self.no_sync {
            cfg.durability = Durability::Data;
        }
    }
}

/// One-line diagnostic for a parse failure.
pub fn usage_message(e: &clap::Error) -> String {
    match e.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::UnknownArgument
        | ErrorKind::TooManyValues
        | ErrorKind::WrongNumberOfValues => USAGE_MESSAGE.to_string(),
        _ => {
            let rendered = e.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            first.trim_start_matches("error: ").trim().to_string()
        }
    }
}

/// True when clap wants to print help/version and exit successfully.
pub fn is_informational(e: &clap::Error) -> bool {
    matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

pub fn parse() -> Result<Args, clap::Error> {
    Args::try_parse()
}

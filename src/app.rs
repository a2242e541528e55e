//! Application orchestrator.
//! Builds the config from CLI flags, initializes logging and runs the move.

use anyhow::Result;
use tracing::debug;

use atomic_mv::cli::Args;
use atomic_mv::{move_file, Config, MoveReport};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);

    init_tracing(&cfg.log_level, cfg.json)?;
    debug!("Starting atomic_mv: {:?}", args);

    match move_file(&cfg, &args.source, &args.destination) {
        Ok(MoveReport::Renamed) => {
            debug!(dest = %args.destination.display(), how = "rename", "Move completed");
            Ok(())
        }
        Ok(MoveReport::Copied(copy)) => {
            debug!(
                dest = %args.destination.display(),
                how = "copy",
                bytes = copy.bytes,
                buf_size = copy.buf_size,
                "Move completed"
            );
            Ok(())
        }
        Err(e) => {
            debug!(
                code = e.code(),
                kind = e.kind(),
                os_code = ?e.io_error().and_then(|io| io.raw_os_error()),
                error = ?e,
                "Move failed"
            );
            Err(e.into())
        }
    }
}

//! Filesystem operations: modularized.

mod atomic;
mod entry;
mod helpers;
mod io_copy;
mod publish;
mod util;

pub use atomic::{attempt_move, MoveOutcome};
pub use entry::{move_file, MoveReport};
pub use helpers::describe_io_error;
pub use io_copy::{copy_chunks, CopyFailure, CopyResult};
pub use publish::{publish_via_copy, publish_via_copy_with, PublishStage};
pub use util::staging_path;

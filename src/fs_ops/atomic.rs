//! Fast path: atomic no-replace rename on one filesystem.
//! - Never overwrites an existing destination.
//! - Reports a cross-device failure as `MoveOutcome::CrossDevice` so the
//!   caller can switch to the publisher; nothing is touched in that case.
//! - Without a native no-replace rename, uses `link` + `unlink`; a failed
//!   unlink is reported separately because the destination already exists.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::errors::{AtomicMvError, Result};
use crate::platform::rename_noreplace;

use super::util::{is_cross_device, RemoveFile};

/// What the fast path achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Destination now names the source file; the source name is gone.
    Renamed,
    /// Source and destination are on different filesystems.
    CrossDevice,
}

/// Try to rename `src` to `dst` atomically without replacing an existing `dst`.
pub fn attempt_move(src: &Path, dst: &Path) -> Result<MoveOutcome> {
    match rename_noreplace(src, dst) {
        Ok(true) => {
            debug!(src = %src.display(), dest = %dst.display(), "renamed atomically");
            Ok(MoveOutcome::Renamed)
        }
        Ok(false) => link_then_unlink(src, dst, &mut |p| fs::remove_file(p)),
        Err(e) => classify(e, src, dst, "rename"),
    }
}

fn classify(e: io::Error, src: &Path, dst: &Path, op: &'static str) -> Result<MoveOutcome> {
    if is_cross_device(&e) {
        debug!(src = %src.display(), dest = %dst.display(), "rename crosses filesystems");
        Ok(MoveOutcome::CrossDevice)
    } else if e.kind() == io::ErrorKind::AlreadyExists {
        Err(AtomicMvError::DestinationExists(dst.to_path_buf()))
    } else {
        Err(AtomicMvError::io(op, src)(e))
    }
}

/// `link(src, dst)` then `unlink(src)`. `dst` appears atomically at the link.
fn link_then_unlink(src: &Path, dst: &Path, remove: RemoveFile<'_>) -> Result<MoveOutcome> {
    if let Err(e) = fs::hard_link(src, dst) {
        return classify(e, src, dst, "link");
    }
    remove(src).map_err(AtomicMvError::io("remove source after link", src))?;
    debug!(src = %src.display(), dest = %dst.display(), "linked and unlinked source");
    Ok(MoveOutcome::Renamed)
}

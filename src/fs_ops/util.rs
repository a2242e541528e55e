use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{AtomicMvError, Result};

/// Removes a path; swapped out in tests to fail a specific unlink on demand.
pub(super) type RemoveFile<'a> = &'a mut dyn FnMut(&Path) -> io::Result<()>;

/// Staging path for `dest`: same directory, same name plus `suffix`.
/// Sharing the directory keeps the final link on one filesystem.
pub fn staging_path(dest: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .ok_or_else(|| AtomicMvError::InvalidDestination(dest.to_path_buf()))?;
    let mut staged: OsString = name.to_os_string();
    staged.push(suffix);
    Ok(dest.with_file_name(staged))
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind::CrossesDevices is too new to rely on everywhere,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Directory an fsync should target for `path`; an empty parent means cwd.
pub(super) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

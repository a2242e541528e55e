//! Unix implementations of platform helpers.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Rename `src` to `dst`, failing with `EEXIST` instead of replacing `dst`.
///
/// Returns `Ok(false)` when no native no-replace rename is available (the
/// kernel or filesystem rejects `RENAME_NOREPLACE`, or this is not Linux);
/// the caller then falls back to `link` + `unlink`.
pub fn rename_noreplace(src: &Path, dst: &Path) -> io::Result<bool> {
    #[cfg(target_os = "linux")]
    {
        match renameat2_noreplace(src, dst) {
            Ok(()) => Ok(true),
            Err(e) if matches!(e.raw_os_error(), Some(libc::EINVAL) | Some(libc::ENOSYS)) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = (src, dst);
        Ok(false)
    }
}

#[cfg(target_os = "linux")]
fn renameat2_noreplace(src: &Path, dst: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    const RENAME_NOREPLACE: libc::c_uint = 1;

    let src_c = CString::new(src.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))?;
    let dst_c = CString::new(dst.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))?;
    let rc = unsafe {
        libc::syscall(
            libc::SYS_renameat2,
            libc::AT_FDCWD,
            src_c.as_ptr(),
            libc::AT_FDCWD,
            dst_c.as_ptr(),
            RENAME_NOREPLACE,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Create the staging file: exclusive create, owner read/write only.
pub fn create_staging_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

/// Optimal I/O block size reported by `fstat` for an open file.
pub fn preferred_block_size(file: &File) -> io::Result<usize> {
    let blksize = file.metadata()?.blksize();
    usize::try_from(blksize).map_err(|_| io::Error::other("block size does not fit in usize"))
}

/// Apply the source's rwx bits to an open file.
pub fn copy_permission_bits(src_meta: &Metadata, file: &File) -> io::Result<()> {
    let mode = src_meta.permissions().mode() & 0o777;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

//! Non-Unix implementations of platform helpers.
//! No no-replace rename primitive is exposed by std here, so every move goes
//! through the caller's `hard_link` (which refuses an existing target) plus
//! `remove_file` fallback.

use std::fs::{File, Metadata, OpenOptions};
use std::io;
use std::path::Path;

pub fn rename_noreplace(_src: &Path, _dst: &Path) -> io::Result<bool> {
    Ok(false)
}

pub fn create_staging_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// No portable block-size query; callers use their configured fallback.
pub fn preferred_block_size(_file: &File) -> io::Result<usize> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

/// Only the read-only flag is meaningful here.
pub fn copy_permission_bits(src_meta: &Metadata, file: &File) -> io::Result<()> {
    file.set_permissions(src_meta.permissions())
}

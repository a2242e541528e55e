//! Platform-specific helpers.
//! This module hides OS differences (Unix/other) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    copy_permission_bits, create_staging_file, preferred_block_size, rename_noreplace,
};

#[cfg(not(unix))]
pub use windows::{
    copy_permission_bits, create_staging_file, preferred_block_size, rename_noreplace,
};

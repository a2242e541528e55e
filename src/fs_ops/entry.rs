//! Top-level move: fast path first, publisher on cross-device.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::errors::{AtomicMvError, Result};

use super::atomic::{attempt_move, MoveOutcome};
use super::io_copy::CopyResult;
use super::publish::publish_via_copy_with;

/// How a completed move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReport {
    /// Same filesystem: atomic rename; the source name no longer exists.
    Renamed,
    /// Different filesystems: staged copy published at the destination.
    /// The source file is left in place.
    Copied(CopyResult),
}

/// Move the regular file `src` to `dst`, which must not exist.
pub fn move_file(cfg: &Config, src: &Path, dst: &Path) -> Result<MoveReport> {
    let meta = fs::symlink_metadata(src).map_err(AtomicMvError::io("stat source file", src))?;
    if !meta.file_type().is_file() {
        return Err(AtomicMvError::NotRegularFile(src.to_path_buf()));
    }

    match attempt_move(src, dst)? {
        MoveOutcome::Renamed => {
            info!(src = %src.display(), dest = %dst.display(), "Renamed file atomically");
            Ok(MoveReport::Renamed)
        }
        MoveOutcome::CrossDevice => {
            info!(
                src = %src.display(),
                dest = %dst.display(),
                "Cross-filesystem move; staging a copy"
            );
            let copied = publish_via_copy_with(cfg, src, dst)?;
            info!(src = %src.display(), "Source left in place after cross-filesystem copy");
            Ok(MoveReport::Copied(copied))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn move_file_same_fs() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("a.txt");
        source.write_str("hello").unwrap();
        let dest = temp.child("b.txt");

        let report = move_file(&Config::default(), source.path(), dest.path()).unwrap();
        assert_eq!(report, MoveReport::Renamed);
        dest.assert("hello");
        assert!(!source.path().exists());
        assert!(!temp.child("b.txt.part").path().exists());
    }

    #[test]
    fn directories_are_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let d = temp.child("folder");
        d.create_dir_all().unwrap();

        let err = move_file(&Config::default(), d.path(), temp.child("moved").path()).unwrap_err();
        assert!(matches!(err, AtomicMvError::NotRegularFile(_)));
        assert!(d.path().is_dir());
        assert!(!temp.child("moved").path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("target");
        target.write_str("t").unwrap();
        let link = temp.child("link");
        std::os::unix::fs::symlink(target.path(), link.path()).unwrap();

        let err = move_file(&Config::default(), link.path(), temp.child("moved").path()).unwrap_err();
        assert!(matches!(err, AtomicMvError::NotRegularFile(_)));
        assert!(link.path().symlink_metadata().is_ok());
    }
}

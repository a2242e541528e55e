//! Cross-device publish: stage a private copy next to the destination, then
//! link it into place.
//!
//! The destination name only ever appears through `link(staging, dest)`, after
//! the staging file holds every byte of the source, so observers see it either
//! absent or complete. Staging and destination share a directory, so the link
//! cannot itself be cross-device.
//!
//! Failure policy: nothing is retried or rolled back. A staging file that was
//! created before the failure stays on disk for inspection; a later run
//! targeting the same destination reports `StagingCollision` until it is
//! removed by hand.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{Config, Durability};
use crate::errors::{AtomicMvError, Result};
use crate::platform::{copy_permission_bits, create_staging_file};

use super::io_copy::{alloc_buffer, choose_buf_size, copy_chunks, CopyFailure, CopyResult};
use super::util::{fsync_dir, parent_dir, staging_path, RemoveFile};

/// Progress of one publish. Only ever moves forward; a failure ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PublishStage {
    Start,
    StagingCreated,
    Copying,
    CopyComplete,
    Published,
    CleanedUp,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PublishStage::Start => "start",
            PublishStage::StagingCreated => "staging_created",
            PublishStage::Copying => "copying",
            PublishStage::CopyComplete => "copy_complete",
            PublishStage::Published => "published",
            PublishStage::CleanedUp => "cleaned_up",
        };
        f.write_str(s)
    }
}

/// Wraps the staging file in the writer the copy loop uses.
type WrapWriter<'a> = &'a mut dyn for<'f> FnMut(&'f File) -> Box<dyn Write + 'f>;

/// Copy `source` to `destination` via a staging file, with default options.
pub fn publish_via_copy(source: &Path, destination: &Path) -> Result<CopyResult> {
    publish_via_copy_with(&Config::default(), source, destination)
}

/// Copy `source` to `destination` via a staging file.
pub fn publish_via_copy_with(cfg: &Config, source: &Path, destination: &Path) -> Result<CopyResult> {
    publish_inner(cfg, source, destination, &mut |f| Box::new(f))
}

pub(crate) fn publish_inner(
    cfg: &Config,
    source: &Path,
    destination: &Path,
    wrap: WrapWriter<'_>,
) -> Result<CopyResult> {
    let mut stage = PublishStage::Start;
    let res = run(cfg, source, destination, wrap, &mut |p| fs::remove_file(p), &mut stage);
    if let Err(e) = &res {
        if stage >= PublishStage::StagingCreated && stage < PublishStage::Published {
            warn!(
                %stage,
                code = e.code(),
                dest = %destination.display(),
                "Publish failed; staging file left in place"
            );
        } else {
            debug!(%stage, code = e.code(), "Publish failed");
        }
    }
    res
}

fn advance(stage: &mut PublishStage, next: PublishStage) {
    debug_assert!(next > *stage, "publish stage went backwards: {} -> {}", stage, next);
    debug!(from = %stage, to = %next, "publish stage");
    *stage = next;
}

fn run(
    cfg: &Config,
    source: &Path,
    destination: &Path,
    wrap: WrapWriter<'_>,
    remove_staging: RemoveFile<'_>,
    stage: &mut PublishStage,
) -> Result<CopyResult> {
    let staging = staging_path(destination, &cfg.staging_suffix)?;

    // Cheap early refusal; the link below is what actually guarantees no clobber.
    if fs::symlink_metadata(destination).is_ok() {
        return Err(AtomicMvError::DestinationExists(destination.to_path_buf()));
    }

    let staged = create_staging_file(&staging).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => AtomicMvError::StagingCollision(staging.clone()),
        _ => AtomicMvError::io("create staging file", &staging)(e),
    })?;
    advance(stage, PublishStage::StagingCreated);

    let mut src = File::open(source).map_err(AtomicMvError::io("open source file", source))?;
    let src_meta = if cfg.preserve_permissions {
        Some(src.metadata().map_err(AtomicMvError::io("stat source file", source))?)
    } else {
        None
    };

    let buf_size = choose_buf_size(&staged, cfg.fallback_buf_size);
    let mut buf = alloc_buffer(buf_size)?;
    advance(stage, PublishStage::Copying);

    let copied = {
        let mut writer = wrap(&staged);
        copy_chunks(&mut src, &mut *writer, &mut buf)
    };
    let copied = copied.map_err(|failure| {
        debug!(written = failure.written(), "copy aborted");
        match failure {
            CopyFailure::Read { source: e, .. } => AtomicMvError::io("read source file", source)(e),
            CopyFailure::Write { source: e, .. } => {
                AtomicMvError::io("write staging file", &staging)(e)
            }
        }
    })?;
    advance(stage, PublishStage::CopyComplete);

    if let Some(meta) = &src_meta {
        copy_permission_bits(meta, &staged)
            .map_err(AtomicMvError::io("set staging file permissions", &staging))?;
    }
    if cfg.durability == Durability::Full {
        staged
            .sync_all()
            .map_err(AtomicMvError::io("sync staging file", &staging))?;
    }
    drop(src);
    drop(staged);

    fs::hard_link(&staging, destination).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => AtomicMvError::DestinationExists(destination.to_path_buf()),
        _ => AtomicMvError::io("publish destination", destination)(e),
    })?;
    advance(stage, PublishStage::Published);

    remove_staging(&staging).map_err(AtomicMvError::io("remove staging file", &staging))?;
    advance(stage, PublishStage::CleanedUp);

    if cfg.durability == Durability::Full {
        let dir = parent_dir(destination);
        if let Err(e) = fsync_dir(dir) {
            warn!(error = %e, dir = %dir.display(), "fsync of destination directory failed; ignoring");
        }
    }

    info!(
        src = %source.display(),
        dest = %destination.display(),
        bytes = copied.bytes,
        buf_size = copied.buf_size,
        "Published copy across filesystems"
    );
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::io_copy::testing::{FailAfter, ShortWriter};
    use tempfile::tempdir;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 7 + i / 13) % 256) as u8).collect()
    }

    #[test]
    fn publishes_and_removes_staging() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let data = pattern(70_000);
        fs::write(&src, &data).unwrap();

        let res = publish_via_copy(&src, &dst).unwrap();
        assert_eq!(res.bytes, data.len() as u64);
        assert_eq!(fs::read(&dst).unwrap(), data);
        assert!(!dir.path().join("dst.bin.part").exists());
        // Copy semantics: the source name is untouched.
        assert_eq!(fs::read(&src).unwrap(), data);
    }

    #[test]
    fn write_failure_leaves_no_destination_but_keeps_partial_staging() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let data = pattern(50_000);
        fs::write(&src, &data).unwrap();

        let cfg = Config::default();
        let err = publish_inner(&cfg, &src, &dst, &mut |f| {
            Box::new(FailAfter {
                inner: f,
                limit: 12_345,
                accepted: 0,
            })
        })
        .unwrap_err();

        assert!(matches!(err, AtomicMvError::Io { op: "write staging file", .. }), "got {err:?}");
        assert!(!dst.exists(), "destination must not appear after a failed copy");
        let staged = fs::read(dir.path().join("dst.bin.part")).unwrap();
        assert_eq!(staged, &data[..12_345]);
        assert_eq!(fs::read(&src).unwrap(), data);
    }

    #[test]
    fn short_writes_still_publish_identical_content() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        let data = pattern(33_333);
        fs::write(&src, &data).unwrap();

        let cfg = Config::default();
        publish_inner(&cfg, &src, &dst, &mut |f| {
            Box::new(ShortWriter {
                inner: f,
                max: 97,
                calls: 0,
            })
        })
        .unwrap();
        assert_eq!(fs::read(&dst).unwrap(), data);
    }

    #[test]
    fn existing_staging_file_is_a_collision() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        let part = dir.path().join("dst.part");
        fs::write(&src, b"source").unwrap();
        fs::write(&part, b"leftover").unwrap();

        let err = publish_via_copy(&src, &dst).unwrap_err();
        assert!(matches!(err, AtomicMvError::StagingCollision(ref p) if *p == part));
        assert!(!dst.exists());
        assert_eq!(fs::read(&part).unwrap(), b"leftover");
        assert_eq!(fs::read(&src).unwrap(), b"source");
    }

    #[test]
    fn existing_destination_is_refused_before_staging() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old").unwrap();

        let err = publish_via_copy(&src, &dst).unwrap_err();
        assert!(matches!(err, AtomicMvError::DestinationExists(_)));
        assert_eq!(fs::read(&dst).unwrap(), b"old");
        assert!(!dir.path().join("dst.part").exists());
    }

    #[test]
    fn missing_source_leaves_empty_staging_and_no_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("nope");
        let dst = dir.path().join("dst");

        let err = publish_via_copy(&src, &dst).unwrap_err();
        assert!(matches!(err, AtomicMvError::Io { op: "open source file", .. }));
        assert!(!dst.exists());
        assert_eq!(fs::metadata(dir.path().join("dst.part")).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn read_failure_leaves_no_destination_but_keeps_staging() {
        let dir = tempdir().unwrap();
        // Opening a directory succeeds on unix; reading it fails with EISDIR.
        let src = dir.path().join("srcdir");
        fs::create_dir(&src).unwrap();
        let dst = dir.path().join("dst");

        let err = publish_via_copy(&src, &dst).unwrap_err();
        assert!(matches!(err, AtomicMvError::Io { op: "read source file", .. }), "got {err:?}");
        assert!(!dst.exists());
        assert!(dir.path().join("dst.part").exists());
    }

    #[test]
    fn staging_unlink_failure_after_publish_is_reported() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        let part = dir.path().join("dst.part");
        let data = pattern(20_000);
        fs::write(&src, &data).unwrap();

        let mut stage = PublishStage::Start;
        let err = run(
            &Config::default(),
            &src,
            &dst,
            &mut |f| Box::new(f),
            &mut |_| Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            &mut stage,
        )
        .unwrap_err();

        assert!(matches!(err, AtomicMvError::Io { op: "remove staging file", .. }), "got {err:?}");
        assert_eq!(stage, PublishStage::Published);
        assert_eq!(fs::read(&dst).unwrap(), data);
        assert_eq!(fs::read(&part).unwrap(), data);
    }

    #[test]
    fn unsynced_publish_copies_everything() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        let data = pattern(10_001);
        fs::write(&src, &data).unwrap();

        let cfg = Config {
            fallback_buf_size: 3,
            durability: Durability::Data,
            ..Config::default()
        };
        let res = publish_via_copy_with(&cfg, &src, &dst).unwrap();
        assert_eq!(res.bytes, 10_001);
        assert_eq!(fs::read(&dst).unwrap(), data);
    }

    #[cfg(unix)]
    #[test]
    fn permissions_follow_flag() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::write(&src, b"x").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

        let plain = dir.path().join("plain");
        publish_via_copy(&src, &plain).unwrap();
        let mode = fs::metadata(&plain).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let kept = dir.path().join("kept");
        let cfg = Config {
            preserve_permissions: true,
            ..Config::default()
        };
        publish_via_copy_with(&cfg, &src, &kept).unwrap();
        let mode = fs::metadata(&kept).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(PublishStage::Start < PublishStage::StagingCreated);
        assert!(PublishStage::Published < PublishStage::CleanedUp);
        assert_eq!(PublishStage::CopyComplete.to_string(), "copy_complete");
    }
}

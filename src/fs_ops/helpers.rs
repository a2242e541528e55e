//! I/O error descriptions.
//!
//! Turns an `io::Error` plus the failing operation and path into the one-line
//! diagnostic shown to users: `<op> '<path>': <os error> — <hint> [os code: N]`.

use std::io;
use std::path::Path;

/// Platform-aware hint for a raw OS error code.
#[cfg(unix)]
fn hint_for_code(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions.",
        libc::EXDEV => "cross-filesystem; atomic rename not possible.",
        libc::ENOENT => "path not found; verify it exists.",
        libc::EEXIST => "already exists; the destination must not exist before the move.",
        libc::ENOSPC => "insufficient space on device.",
        libc::EROFS => "read-only filesystem; cannot write here.",
        libc::EISDIR => "is a directory; only regular files can be moved.",
        libc::ENOTDIR => "a path component is not a directory.",
        libc::ELOOP => "too many symbolic link levels (ELOOP); possible symlink cycle.",
        libc::ENAMETOOLONG => "filename or path too long; shorten path segments.",
        libc::EMFILE => "process file descriptor limit reached; close files or raise limits.",
        libc::ENFILE => "system-wide file table overflow; reduce open files.",
        libc::EIO => "low-level I/O error; check the device.",
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(unix))]
fn hint_for_code(code: i32) -> Option<&'static str> {
    // Common Win32 errors
    let hint = match code {
        5 => "access denied; check permissions.",            // ERROR_ACCESS_DENIED
        17 => "not same device; cross-filesystem move.",     // ERROR_NOT_SAME_DEVICE
        2 | 3 => "path not found; verify it exists.",        // FILE/PATH NOT FOUND
        80 | 183 => "already exists; the destination must not exist before the move.",
        112 => "insufficient disk space.",                   // ERROR_DISK_FULL
        _ => return None,
    };
    Some(hint)
}

fn hint_for_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions.")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => {
            Some("already exists; the destination must not exist before the move.")
        }
        io::ErrorKind::WriteZero => Some("device accepted no bytes; check free space."),
        io::ErrorKind::OutOfMemory => Some("out of memory."),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus platform-aware hints.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = hint_for_code(code) {
                msg.push_str(" — ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(hint) = hint_for_kind(e.kind()) {
                msg.push_str(" — ");
                msg.push_str(hint);
            }
        }
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn enospc_hint_and_code() {
        let msg = describe_io_error(
            "write staging file",
            Path::new("/tmp/x.part"),
            &io::Error::from_raw_os_error(libc::ENOSPC),
        );
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains(&format!("[os code: {}]", libc::ENOSPC)));
    }

    #[test]
    fn kind_only_errors_get_kind_hint_without_code() {
        let msg = describe_io_error(
            "write staging file",
            Path::new("x.part"),
            &io::Error::from(io::ErrorKind::WriteZero),
        );
        assert!(msg.contains("accepted no bytes"), "msg was: {msg}");
        assert!(!msg.contains("os code"));
    }

    #[test]
    fn unknown_error_is_plain() {
        let msg = describe_io_error("op", Path::new("p"), &io::Error::other("boom"));
        assert_eq!(msg, "op 'p': boom");
    }
}

//! Chunked copy with explicit short-write handling.
//!
//! The publisher needs to know exactly which side failed and how many bytes
//! reached the staging file, so this is a hand-driven read/write loop rather
//! than `io::copy`:
//! - each chunk read from the source is written out in a sub-loop until every
//!   byte is accepted (a single `write` may take fewer bytes than offered);
//! - a `write` that accepts zero bytes is an error (`WriteZero`);
//! - `Interrupted` is retried on both sides;
//! - a zero-length read is end-of-file.

use std::fs::File;
use std::io::{self, Read, Write};

use tracing::debug;

use crate::errors::{AtomicMvError, Result};
use crate::platform::preferred_block_size;

/// Result of a chunked copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyResult {
    /// Total bytes copied from source to destination.
    pub bytes: u64,
    /// Size of the buffer used for copying.
    pub buf_size: usize,
}

/// Which side of the copy failed, with the bytes already written.
#[derive(Debug)]
pub enum CopyFailure {
    Read { source: io::Error, written: u64 },
    Write { source: io::Error, written: u64 },
}

impl CopyFailure {
    pub fn written(&self) -> u64 {
        match self {
            CopyFailure::Read { written, .. } | CopyFailure::Write { written, .. } => *written,
        }
    }
}

/// Buffer size for writing into `dest`: its preferred block size, else `fallback`.
/// Only affects performance.
pub fn choose_buf_size(dest: &File, fallback: usize) -> usize {
    match preferred_block_size(dest) {
        Ok(n) if n > 0 => n,
        Ok(_) => fallback,
        Err(e) => {
            debug!(error = %e, fallback, "block size query failed; using fallback buffer size");
            fallback
        }
    }
}

/// Allocate a zeroed copy buffer, reporting allocation failure instead of aborting.
pub fn alloc_buffer(size: usize) -> Result<Vec<u8>> {
    let size = size.max(1);
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| AtomicMvError::Allocation { bytes: size })?;
    buf.resize(size, 0);
    Ok(buf)
}

/// Copy `reader` to `writer` through `buf` until EOF.
pub fn copy_chunks<R, W>(
    reader: &mut R,
    writer: &mut W,
    buf: &mut [u8],
) -> std::result::Result<CopyResult, CopyFailure>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut written: u64 = 0;
    loop {
        let n = match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(CopyFailure::Read { source, written }),
        };
        write_chunk(writer, &buf[..n], &mut written)
            .map_err(|source| CopyFailure::Write { source, written })?;
    }
    Ok(CopyResult {
        bytes: written,
        buf_size: buf.len(),
    })
}

fn write_chunk<W: Write + ?Sized>(writer: &mut W, mut chunk: &[u8], written: &mut u64) -> io::Result<()> {
    while !chunk.is_empty() {
        match writer.write(chunk) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero)),
            Ok(n) => {
                chunk = &chunk[n..];
                *written += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

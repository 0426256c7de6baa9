//! Single byte-range parsing for the `Range` request header.

use thiserror::Error;

/// Reasons a `Range` header cannot be honored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Not of the form `bytes=start-end`.
    #[error("malformed range header: {0}")]
    Malformed(String),
    /// Well formed, but outside the file.
    #[error("range not satisfiable for size {size}")]
    Unsatisfiable { size: u64 },
}

/// An inclusive byte range resolved against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered. Never zero.
    pub fn chunk_len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse a `Range` header value against a file of `size` bytes.
///
/// Accepts `bytes=start-end`, `bytes=start-` and the suffix form `bytes=-n`.
/// Only the first range of a comma separated list is used. `end` is clamped
/// to the last byte of the file.
pub fn parse_range(header: &str, size: u64) -> Result<ByteRange, RangeError> {
    let malformed = || RangeError::Malformed(header.to_string());

    let ranges = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(malformed)?;
    let first = ranges.split(',').next().unwrap_or_default().trim();
    let (start, end) = first.split_once('-').ok_or_else(malformed)?;
    let (start, end) = (start.trim(), end.trim());

    if size == 0 {
        return Err(RangeError::Unsatisfiable { size });
    }
    let last = size - 1;

    if start.is_empty() {
        let suffix: u64 = end.parse().map_err(|_| malformed())?;
        if suffix == 0 {
            return Err(RangeError::Unsatisfiable { size });
        }
        return Ok(ByteRange {
            start: size.saturating_sub(suffix),
            end: last,
        });
    }

    let start: u64 = start.parse().map_err(|_| malformed())?;
    let end: u64 = if end.is_empty() {
        last
    } else {
        end.parse::<u64>().map_err(|_| malformed())?.min(last)
    };

    if start > end {
        return Err(RangeError::Unsatisfiable { size });
    }

    Ok(ByteRange { start, end })
}

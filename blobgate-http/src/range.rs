//! `Range` header parsing against a known blob size.

use blobgate_store::{ByteRange, ResolvedRange};

/// Outcome of resolving a well-formed `Range` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Within `[0, size)`; serve partial content.
    Satisfiable(ResolvedRange),
    /// Well-formed but outside the blob; answer 416.
    Unsatisfiable,
}

/// Parse a single-range `Range` header value against a blob's total size.
///
/// Handles `bytes=a-b`, `bytes=a-`, and the suffix form `bytes=-n` (last
/// `n` bytes). Returns `None` for anything malformed, including multi-range
/// values, which callers treat as "no range requested" per RFC 7233.
pub fn parse_range(value: &str, size: u64) -> Option<RangeOutcome> {
    let spec = value.strip_prefix("bytes=")?.trim();
    if spec.contains(',') {
        return None;
    }
    let (start_part, end_part) = spec.split_once('-')?;

    let range = if start_part.is_empty() {
        // suffix form: the last n bytes
        let suffix: u64 = end_part.parse().ok()?;
        if suffix == 0 || size == 0 {
            return Some(RangeOutcome::Unsatisfiable);
        }
        ByteRange::from_start(size.saturating_sub(suffix))
    } else {
        let start: u64 = start_part.parse().ok()?;
        if end_part.is_empty() {
            ByteRange::from_start(start)
        } else {
            let end: u64 = end_part.parse().ok()?;
            if end < start {
                return None;
            }
            ByteRange::new(start, Some(end))
        }
    };

    Some(match range.resolve(size) {
        Some(resolved) => RangeOutcome::Satisfiable(resolved),
        None => RangeOutcome::Unsatisfiable,
    })
}

/// `Content-Range` value for a partial response.
pub fn content_range(resolved: &ResolvedRange) -> String {
    format!(
        "bytes {}-{}/{}",
        resolved.start, resolved.end, resolved.total_size
    )
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfied_content_range(size: u64) -> String {
    format!("bytes */{size}")
}

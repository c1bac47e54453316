//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only (RFC 9110 §14.2). Multi-range requests are
//! answered with the full representation.

/// Resolved byte range, both ends inclusive and within the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a body of `total` bytes
    pub fn content_range(&self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Serve this slice with 206
    Valid(ByteRange),
    /// Syntactically valid but outside the body - 416
    NotSatisfiable,
    /// No Range header, unsupported unit, malformed or reversed - serve everything
    None,
}

/// Parse a `Range` header against a body of `size` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn parse_range_header(range_header: Option<&str>, size: usize) -> RangeParseResult {
    let Some(ranges) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if ranges.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = ranges.split_once('-') else {
        return RangeParseResult::None;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        return suffix_range(last, size);
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeParseResult::None;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<usize>() {
            Ok(end) => Some(end),
            Err(_) => return RangeParseResult::None,
        }
    };

    // A last position before the first makes the range invalid, not unsatisfiable
    if end.is_some_and(|end| end < start) {
        return RangeParseResult::None;
    }
    if start >= size {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(ByteRange {
        start,
        end: end.map_or(size - 1, |end| end.min(size - 1)),
    })
}

/// `-N`: the last N bytes; a suffix longer than the body selects all of it
fn suffix_range(last: &str, size: usize) -> RangeParseResult {
    let Ok(suffix) = last.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if suffix == 0 || size == 0 {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange {
        start: size.saturating_sub(suffix),
        end: size - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: usize, end: usize) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
        assert_eq!(
            parse_range_header(Some("items=0-1"), 100),
            RangeParseResult::None
        );
    }

    #[test]
    fn test_bounded_and_open() {
        assert_eq!(parse_range_header(Some("bytes=0-9"), 100), valid(0, 9));
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
        assert_eq!(parse_range_header(Some("bytes=90-500"), 100), valid(90, 99));
    }

    #[test]
    fn test_suffix() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), valid(0, 99));
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_malformed_is_ignored() {
        assert_eq!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeParseResult::None
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::None
        );
        assert_eq!(
            parse_range_header(Some("bytes=9-3"), 100),
            RangeParseResult::None
        );
        assert_eq!(
            parse_range_header(Some("bytes=300-200"), 100),
            RangeParseResult::None
        );
    }

    #[test]
    fn test_content_range() {
        let range = ByteRange { start: 10, end: 19 };
        assert_eq!(range.content_length(), 10);
        assert_eq!(range.content_range(100), "bytes 10-19/100");
    }
}

//! Route pattern segments.
//!
//! A pattern such as `/blog/{id}/comments` is a sequence of `/`-delimited
//! segments. A segment shaped exactly `{identifier}` is a placeholder; every
//! other segment is a literal compared byte for byte.

/// One component of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Must equal the request segment exactly.
    Literal(&'a str),
    /// Matches any non-empty request segment. Holds the placeholder name.
    Param(&'a str),
}

impl<'a> Segment<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match placeholder_name(raw) {
            Some(name) => Segment::Param(name),
            None => Segment::Literal(raw),
        }
    }

    /// Returns true if this pattern segment accepts the given request segment.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Segment::Literal(literal) => *literal == value,
            Segment::Param(_) => !value.is_empty(),
        }
    }
}

/// Returns the name inside a `{identifier}` segment.
///
/// The identifier must be one or more ASCII word characters
/// (`[A-Za-z0-9_]`).
pub fn placeholder_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        Some(name)
    } else {
        None
    }
}

/// Splits a path or pattern into segments after trimming leading and trailing
/// slashes. The root path yields a single empty segment.
pub fn split_trimmed(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/').split('/')
}

/// Parses a pattern into its segments, trimmed the same way as request paths.
pub fn parse(pattern: &str) -> Vec<Segment<'_>> {
    split_trimmed(pattern).map(Segment::parse).collect()
}

/// Counts the placeholder segments of a pattern.
pub fn placeholder_count(pattern: &str) -> usize {
    pattern
        .split('/')
        .filter(|segment| placeholder_name(segment).is_some())
        .count()
}

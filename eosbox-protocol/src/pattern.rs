//! Address pattern matching
//!
//! Patterns are compared segment by segment against an address, starting
//! at an offset so routing can be chained: match `/eos` first, then match
//! `/out/param/pan` against what is left.
//!
//! Within a segment:
//! - `*` matches any run of characters (a lone `*` matches any segment)
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]`, `[!x]` match one character from (or not from) a set
//! - `{pan,tilt}` matches one of the listed literals

/// Result of a successful prefix match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouteMatch<'a> {
    /// Part of the address the pattern consumed
    pub matched: &'a str,
    /// Rest of the address; empty or starting with `/`
    pub remainder: &'a str,
    /// Offset into the full address just past the matched part
    pub offset: usize,
}

/// Match `pattern` against a prefix of `address[offset..]`
///
/// Both the pattern and the addressed part must start with `/`. The
/// pattern must consume whole segments, so `/eo` does not match `/eos`.
pub fn match_prefix<'a>(address: &'a str, offset: usize, pattern: &str) -> Option<RouteMatch<'a>> {
    let target = address.get(offset..)?;
    let mut rest = target.strip_prefix('/')?;
    let pattern = pattern.strip_prefix('/')?;
    let mut consumed = 1;

    for (i, pat_seg) in pattern.split('/').enumerate() {
        if i > 0 {
            rest = rest.strip_prefix('/')?;
            consumed += 1;
        }
        let end = rest.find('/').unwrap_or(rest.len());
        if !glob(pat_seg.as_bytes(), &rest.as_bytes()[..end]) {
            return None;
        }
        consumed += end;
        rest = &rest[end..];
    }

    Some(RouteMatch {
        matched: &target[..consumed],
        remainder: rest,
        offset: offset + consumed,
    })
}

/// Whether `pattern` matches the whole of `address`
pub fn matches(address: &str, pattern: &str) -> bool {
    match_prefix(address, 0, pattern).is_some_and(|m| m.remainder.is_empty())
}

fn glob(pat: &[u8], text: &[u8]) -> bool {
    match pat.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|i| glob(rest, &text[i..])),
        Some((b'?', rest)) => !text.is_empty() && glob(rest, &text[1..]),
        Some((b'[', rest)) => {
            let Some((&c, tail)) = text.split_first() else {
                return false;
            };
            match bracket(rest, c) {
                Some((true, after)) => glob(after, tail),
                _ => false,
            }
        }
        Some((b'{', rest)) => {
            let Some(close) = rest.iter().position(|&b| b == b'}') else {
                return false;
            };
            let after = &rest[close + 1..];
            rest[..close].split(|&b| b == b',').any(|alt| {
                text.starts_with(alt) && glob(after, &text[alt.len()..])
            })
        }
        Some((&c, rest)) => text.first() == Some(&c) && glob(rest, &text[1..]),
    }
}

/// Test `c` against a `[...]` set whose opening bracket is already consumed
///
/// Returns the verdict plus the pattern following the closing bracket,
/// or `None` if the set is never closed.
fn bracket(set: &[u8], c: u8) -> Option<(bool, &[u8])> {
    let close = set.iter().position(|&b| b == b']')?;
    let (mut body, after) = (&set[..close], &set[close + 1..]);
    let negate = body.first() == Some(&b'!');
    if negate {
        body = &body[1..];
    }

    let mut hit = false;
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == b'-' {
            hit |= body[i] <= c && c <= body[i + 2];
            i += 3;
        } else {
            hit |= body[i] == c;
            i += 1;
        }
    }

    Some((hit != negate, after))
}

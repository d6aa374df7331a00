use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;

// Characters escaped when a value is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// Characters escaped in query string keys and values.
const QUERY: &AsciiSet = &SEGMENT.add(b'&').add(b'+').add(b'=').add(b'[').add(b']');

// Decodes a request path for matching.
//
// Everything is decoded once, except that an encoded slash stays `%2F` so
// it can never act as a separator, and a percent sign produced by decoding
// is written back as `%25`. The result is unambiguous: `decode_param`
// recovers the exact bytes of any captured value.
pub(crate) fn decode_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    if !path.contains('%') {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len());
    for (i, piece) in split_encoded_slashes(path).enumerate() {
        if i > 0 {
            out.push_str("%2F");
        }

        let decoded = percent_decode_str(piece).decode_utf8_lossy();
        out.push_str(&decoded.replace('%', "%25"));
    }

    Cow::Owned(out)
}

// Decodes a value captured from a path produced by `decode_path`.
pub(crate) fn decode_param(value: &str) -> Cow<'_, str> {
    percent_decode_str(value).decode_utf8_lossy()
}

// Encodes a parameter value for use in a path.
pub(crate) fn encode_segment(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, SEGMENT).into()
}

// Encodes a query string key or value.
pub(crate) fn encode_query(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, QUERY).into()
}

/// Returns the path with its trailing slash added or removed.
///
/// The root path has no alternative.
///
/// ```rust
/// use routematch::toggle_trailing_slash;
///
/// assert_eq!(toggle_trailing_slash("/foo").as_deref(), Some("/foo/"));
/// assert_eq!(toggle_trailing_slash("/foo/").as_deref(), Some("/foo"));
/// assert_eq!(toggle_trailing_slash("/"), None);
/// ```
pub fn toggle_trailing_slash(path: &str) -> Option<String> {
    match path {
        "" | "/" => None,
        _ => match path.strip_suffix('/') {
            Some(trimmed) => Some(trimmed.to_owned()),
            None => Some(format!("{}/", path)),
        },
    }
}

fn split_encoded_slashes(path: &str) -> impl Iterator<Item = &str> {
    let bytes = path.as_bytes();
    let mut start = 0;
    let mut i = 0;
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        while i + 2 < bytes.len() {
            if bytes[i] == b'%' && bytes[i + 1] == b'2' && (bytes[i + 2] | 0x20) == b'f' {
                let piece = &path[start..i];
                i += 3;
                start = i;
                return Some(piece);
            }
            i += 1;
        }

        done = true;
        Some(&path[start..])
    })
}

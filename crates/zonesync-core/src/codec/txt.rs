// # TXT Sanitize
//
// TXT record data travels as the trailing field of a line record, so it has
// to be quoted and split the way the provider expects before it is sent.
// The rule differs between provider dialects, hence the strategy trait.

use std::fmt::Debug;

/// Maximum length of a single TXT character-string, in bytes (RFC 1035 §3.3)
pub const MAX_SEGMENT_LEN: usize = 255;

/// Strategy for turning a raw TXT value into the provider's wire form
pub trait TxtSanitizer: Debug + Send + Sync {
    /// Encode a raw TXT value
    fn sanitize(&self, value: &str) -> String;
}

/// Quote and split TXT data into `"..." "..."` segments
///
/// Each segment holds at most [`MAX_SEGMENT_LEN`] bytes of raw data, split on
/// a char boundary. Backslashes and double quotes are escaped inside each
/// segment and line breaks become spaces. A value that is already a
/// well-formed run of quoted segments (as read back from the provider) is
/// passed through unchanged; anything else is treated as raw data.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedSegments;

impl TxtSanitizer for QuotedSegments {
    fn sanitize(&self, value: &str) -> String {
        if is_segmented(value) {
            return value.to_string();
        }

        split_segments(value, MAX_SEGMENT_LEN)
            .into_iter()
            .map(|segment| format!("\"{}\"", escape(segment)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Leave TXT data untouched, for dialects that quote server-side
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl TxtSanitizer for Verbatim {
    fn sanitize(&self, value: &str) -> String {
        value.to_string()
    }
}

/// Whether `value` is already space-separated `"..."` segments
///
/// Inside a segment only `\"` and `\\` style escapes may carry a quote. No
/// line breaks anywhere, and no segment over [`MAX_SEGMENT_LEN`] data bytes.
fn is_segmented(value: &str) -> bool {
    if value.contains(['\n', '\r']) {
        return false;
    }

    let mut chars = value.chars().peekable();
    let mut segments = 0usize;
    loop {
        match chars.next() {
            None => return segments > 0,
            Some(' ') if segments > 0 => continue,
            Some('"') => {}
            Some(_) => return false,
        }

        let mut len = 0;
        loop {
            match chars.next() {
                None => return false,
                Some('"') => break,
                Some('\\') => match chars.next() {
                    Some(c) => len += c.len_utf8(),
                    None => return false,
                },
                Some(c) => len += c.len_utf8(),
            }
        }
        if len > MAX_SEGMENT_LEN {
            return false;
        }
        segments += 1;

        if chars.peek().is_some_and(|&c| c != ' ') {
            return false;
        }
    }
}

fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 2);
    for c in segment.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

fn split_segments(value: &str, max: usize) -> Vec<&str> {
    if value.is_empty() {
        return vec![value];
    }

    let mut segments = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        let mut cut = floor_char_boundary(rest, max);
        if cut == 0 {
            // a single char wider than `max`; never loop forever
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(cut);
        segments.push(head);
        rest = tail;
    }
    segments
}

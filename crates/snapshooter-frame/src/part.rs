use bytes::Bytes;
use snapshooter_split::{split, split_bytes};

/// Blank line separating part headers from the part body.
pub const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

const CRLF: &[u8] = b"\r\n";

/// One image extracted from a multipart segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Part headers in arrival order, names as sent.
    pub headers: Vec<(String, String)>,
    /// The raw image bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame with no part headers.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            headers: Vec::new(),
            payload: payload.into(),
        }
    }

    /// Look up a part header, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The part's declared content type, usually `image/jpeg`.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Extract the frame carried by one segment (the bytes between two
/// boundary delimiters).
///
/// The segment is split once on [`HEADER_SEPARATOR`]; the second piece is
/// the payload. The line break that belongs to the following delimiter is
/// removed. Returns `None` when there is no separator or no payload.
pub fn parse_part(segment: &Bytes) -> Option<Frame> {
    let pieces = split_bytes(segment, HEADER_SEPARATOR, Some(1));
    let [head, body] = pieces.as_slice() else {
        return None;
    };

    let payload = match body.strip_suffix(CRLF) {
        Some(trimmed) => body.slice_ref(trimmed),
        None => body.clone(),
    };
    if payload.is_empty() {
        return None;
    }

    Some(Frame {
        headers: parse_headers(head),
        payload,
    })
}

/// Whether a segment carries nothing but whitespace (multipart preamble).
pub(crate) fn is_blank(segment: &[u8]) -> bool {
    segment.iter().all(u8::is_ascii_whitespace)
}

fn parse_headers(head: &[u8]) -> Vec<(String, String)> {
    split(head, CRLF, None)
        .into_iter()
        .filter_map(|line| {
            let line = std::str::from_utf8(line).ok()?;
            let (name, value) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

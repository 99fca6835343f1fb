use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Prefix that turns a boundary token into its on-the-wire delimiter.
pub const DELIMITER_PREFIX: &[u8] = b"--";

/// The delimiter separating successive parts of a multipart body.
///
/// Holds `--<token>`, never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Boundary {
    delimiter: Bytes,
}

impl Boundary {
    /// Build a boundary from its bare token (without the leading `--`).
    pub fn new(token: impl AsRef<[u8]>) -> Result<Self> {
        let token = token.as_ref();
        if token.is_empty() {
            return Err(FrameError::MissingBoundary {
                content_type: String::new(),
            });
        }

        let mut delimiter = BytesMut::with_capacity(DELIMITER_PREFIX.len() + token.len());
        delimiter.put_slice(DELIMITER_PREFIX);
        delimiter.put_slice(token);
        Ok(Self {
            delimiter: delimiter.freeze(),
        })
    }

    /// Derive the boundary from a response content type.
    ///
    /// Parameters are `;`-separated and the `boundary` key is matched
    /// case-insensitively. Surrounding quotes are removed from the value; a
    /// `;` inside quotes belongs to the value. An unterminated quote counts
    /// as a missing boundary.
    ///
    /// ```
    /// use snapshooter_frame::Boundary;
    ///
    /// let b = Boundary::from_content_type(Some("multipart/x-mixed-replace; boundary=frame")).unwrap();
    /// assert_eq!(b.delimiter(), b"--frame");
    /// ```
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self> {
        let content_type = content_type.ok_or(FrameError::MissingContentType)?;

        let token = parameters(content_type)
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
            .and_then(|(_, value)| unquote(value.trim()))
            .filter(|token| !token.is_empty());

        match token {
            Some(token) => Self::new(token),
            None => Err(FrameError::MissingBoundary {
                content_type: content_type.to_string(),
            }),
        }
    }

    /// The bare token, as declared in the content type.
    pub fn token(&self) -> &[u8] {
        &self.delimiter[DELIMITER_PREFIX.len()..]
    }

    /// The full delimiter, `--<token>`.
    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Content type that announces this boundary.
    pub fn content_type(&self) -> String {
        format!(
            "multipart/x-mixed-replace; boundary={}",
            String::from_utf8_lossy(self.token())
        )
    }
}

impl fmt::Debug for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Boundary")
            .field(&String::from_utf8_lossy(&self.delimiter))
            .finish()
    }
}

// `;` separators outside double quotes.
fn parameters(content_type: &str) -> impl Iterator<Item = &str> {
    let mut quoted = false;
    content_type.split(move |c: char| {
        if c == '"' {
            quoted = !quoted;
        }
        c == ';' && !quoted
    })
}

fn unquote(value: &str) -> Option<&str> {
    match value.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"'),
        None => Some(value),
    }
}

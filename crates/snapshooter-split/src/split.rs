use std::iter::FusedIterator;

use bytes::Bytes;

/// Find the first occurrence of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let (&first, tail) = needle.split_first()?;
    if needle.len() > haystack.len() {
        return None;
    }

    let last_start = haystack.len() - needle.len();
    let mut pos = 0usize;
    while pos <= last_start {
        let offset = haystack[pos..=last_start]
            .iter()
            .position(|&b| b == first)?;
        let start = pos + offset;
        if &haystack[start + 1..start + needle.len()] == tail {
            return Some(start);
        }
        pos = start + 1;
    }
    None
}

/// Lazy iterator over the delimiter-terminated pieces of a buffer.
///
/// Only pieces that were closed by a delimiter are yielded. Whatever follows
/// the last consumed delimiter is available through [`Splits::remainder`],
/// which lets callers keep the unterminated tail without scanning twice.
#[derive(Debug, Clone)]
pub struct Splits<'a, 'd> {
    rest: &'a [u8],
    delimiter: &'d [u8],
    remaining: Option<usize>,
    consumed: usize,
}

impl<'a> Splits<'a, '_> {
    /// Bytes not yet consumed by a delimiter match.
    pub fn remainder(&self) -> &'a [u8] {
        self.rest
    }

    /// Number of input bytes consumed so far, delimiters included.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<'a> Iterator for Splits<'a, '_> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }

        let pos = find(self.rest, self.delimiter)?;
        let piece = &self.rest[..pos];
        let advance = pos + self.delimiter.len();

        self.rest = &self.rest[advance..];
        self.consumed += advance;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        Some(piece)
    }
}

impl FusedIterator for Splits<'_, '_> {}

/// Iterate the pieces of `data` that are terminated by `delimiter`.
///
/// At most `max_splits` delimiters are consumed (`None` means unbounded).
pub fn splits<'a, 'd>(
    data: &'a [u8],
    delimiter: &'d [u8],
    max_splits: Option<usize>,
) -> Splits<'a, 'd> {
    Splits {
        rest: data,
        delimiter,
        remaining: max_splits,
        consumed: 0,
    }
}

/// Split `data` on `delimiter`.
///
/// Each match yields the bytes before it. After `max_splits` matches the
/// scan stops, and the bytes left over form one final piece when non-empty.
///
/// ```
/// use snapshooter_split::split;
///
/// assert_eq!(split(b"a--b--c", b"--", None), vec![&b"a"[..], b"b", b"c"]);
/// assert_eq!(split(b"a--b--c", b"--", Some(1)), vec![&b"a"[..], b"b--c"]);
/// assert_eq!(split(b"a--", b"--", None), vec![&b"a"[..]]);
/// assert!(split(b"", b"--", None).is_empty());
/// ```
pub fn split<'a>(data: &'a [u8], delimiter: &[u8], max_splits: Option<usize>) -> Vec<&'a [u8]> {
    let mut iter = splits(data, delimiter, max_splits);
    let mut pieces: Vec<&'a [u8]> = iter.by_ref().collect();

    let rest = iter.remainder();
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

/// Zero-copy [`split`] over a shared buffer.
pub fn split_bytes(data: &Bytes, delimiter: &[u8], max_splits: Option<usize>) -> Vec<Bytes> {
    split(data, delimiter, max_splits)
        .into_iter()
        .map(|piece| data.slice_ref(piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference behaviour built on `str::splitn`, with the trailing empty
    /// piece removed.
    fn reference(data: &str, delimiter: &str, max_splits: Option<usize>) -> Vec<String> {
        let mut pieces: Vec<String> = match max_splits {
            Some(n) => data.splitn(n + 1, delimiter).map(str::to_string).collect(),
            None => data.split(delimiter).map(str::to_string).collect(),
        };
        if pieces.last().is_some_and(String::is_empty) {
            pieces.pop();
        }
        pieces
    }

    fn words(alphabet: &[u8], max_len: usize) -> Vec<String> {
        let mut out = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for word in &frontier {
                for &c in alphabet {
                    let mut w = word.clone();
                    w.push(c as char);
                    next.push(w);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    fn as_strings(pieces: Vec<&[u8]>) -> Vec<String> {
        pieces
            .into_iter()
            .map(|p| String::from_utf8(p.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn matches_str_split_exhaustively() {
        let delimiters = ["a", "ab", "aa", "bab", "--"];
        for data in words(b"ab-", 6) {
            for delimiter in delimiters {
                for max in [None, Some(0), Some(1), Some(2)] {
                    let got = as_strings(split(data.as_bytes(), delimiter.as_bytes(), max));
                    assert_eq!(
                        got,
                        reference(&data, delimiter, max),
                        "data={data:?} delimiter={delimiter:?} max={max:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn join_reproduces_input() {
        for data in words(b"xy", 7) {
            let delimiter = "xy";
            let mut joined = as_strings(split(data.as_bytes(), delimiter.as_bytes(), None)).join(delimiter);
            if data.ends_with(delimiter) {
                joined.push_str(delimiter);
            }
            assert_eq!(joined, data);
        }
    }

    #[test]
    fn length_counts_delimiters_plus_trailing_piece() {
        let data = b"one\r\ntwo\r\nthree";
        assert_eq!(split(data, b"\r\n", None).len(), 3);

        let data = b"one\r\ntwo\r\n";
        assert_eq!(split(data, b"\r\n", None).len(), 2);

        assert_eq!(split(b"one\r\ntwo\r\nthree", b"\r\n", Some(1)).len(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split(b"", b"--", None).is_empty());
        assert!(split(b"", b"--", Some(0)).is_empty());
        assert!(split(b"", b"", None).is_empty());
    }

    #[test]
    fn zero_max_splits_returns_whole_input() {
        assert_eq!(split(b"a--b--c", b"--", Some(0)), vec![&b"a--b--c"[..]]);
    }

    #[test]
    fn missing_delimiter_returns_whole_input() {
        assert_eq!(split(b"no boundary here", b"--B", None), vec![&b"no boundary here"[..]]);
    }

    #[test]
    fn adjacent_delimiters_keep_empty_pieces() {
        assert_eq!(split(b"--B--Bx", b"--B", None), vec![&b""[..], b"", b"x"]);
    }

    #[test]
    fn empty_delimiter_never_matches() {
        assert_eq!(split(b"abc", b"", None), vec![&b"abc"[..]]);
        assert_eq!(find(b"abc", b""), None);
    }

    #[test]
    fn find_handles_partial_prefix_matches() {
        assert_eq!(find(b"aaab", b"aab"), Some(1));
        assert_eq!(find(b"--B", b"--B"), Some(0));
        assert_eq!(find(b"-", b"--B"), None);
        assert_eq!(find(b"xx--", b"--B"), None);
    }

    #[test]
    fn splits_tracks_remainder_and_consumed() {
        let mut iter = splits(b"head--Bbody--Btail", b"--B", None);
        assert_eq!(iter.next(), Some(&b"head"[..]));
        assert_eq!(iter.next(), Some(&b"body"[..]));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.remainder(), b"tail");
        assert_eq!(iter.consumed(), b"head--Bbody--B".len());
    }

    #[test]
    fn splits_stops_at_limit() {
        let mut iter = splits(b"a\r\n\r\nb\r\n\r\nc", b"\r\n\r\n", Some(1));
        assert_eq!(iter.next(), Some(&b"a"[..]));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.remainder(), b"b\r\n\r\nc");
    }

    #[test]
    fn split_bytes_shares_the_source_buffer() {
        let data = Bytes::from_static(b"x--y--");
        let pieces = split_bytes(&data, b"--", None);
        assert_eq!(pieces, vec![Bytes::from_static(b"x"), Bytes::from_static(b"y")]);
        assert_eq!(pieces[0].as_ptr(), data.as_ptr());
    }

    #[test]
    fn input_is_left_untouched() {
        let data = b"a,b,c".to_vec();
        let before = data.clone();
        let _ = split(&data, b",", None);
        let _ = split(&data, b",", Some(1));
        assert_eq!(data, before);
    }
}

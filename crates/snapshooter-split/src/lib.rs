//! Delimiter-based splitting of byte buffers.
//!
//! This is the lowest layer of snapshooter. It behaves like `str::split` for
//! arbitrary bytes:
//! - Matches are found left to right, first match wins, no overlaps
//! - Empty pieces between adjacent delimiters are kept
//! - A trailing empty piece is dropped, so empty input yields no pieces
//!
//! Everything here is pure and allocation-light; there is no I/O and no
//! state carried between calls.

pub mod split;

pub use split::{find, split, split_bytes, splits, Splits};

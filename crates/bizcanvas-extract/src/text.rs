//! Plain text and lightweight markup extraction.
//!
//! Plain text and markdown carry no page structure, so the bytes are read
//! as UTF-8 (lossy) and returned verbatim with no page count.

use bytes::Bytes;

pub(crate) fn extract(bytes: &Bytes) -> (String, Option<u32>) {
    (String::from_utf8_lossy(bytes).into_owned(), None)
}

//! Legacy binary Word (`.doc`) extraction.
//!
//! The OLE compound format has no maintained Rust parser, so extraction is
//! a best-effort scan for printable text runs, checking both the 8-bit and
//! UTF-16LE encodings the format stores text in. Files with no readable
//! runs are reported as corrupt.

use bizcanvas_core::{Error, Result};
use bytes::Bytes;

/// Minimum characters for a run to count as document text rather than
/// structural noise.
const MIN_RUN_CHARS: usize = 8;

pub(crate) fn extract(bytes: Bytes, filename: &str) -> Result<(String, Option<u32>)> {
    let ansi = scan_ansi_runs(&bytes);
    let wide = scan_utf16_runs(&bytes);

    let text = if wide.len() > ansi.len() { wide } else { ansi };
    if text.trim().is_empty() {
        return Err(Error::extraction(filename, "no readable text found"));
    }

    Ok((text, None))
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte) || byte == b'\t'
}

/// Collects printable 8-bit runs, treating Word's `\r` paragraph marks as
/// run boundaries.
fn scan_ansi_runs(bytes: &[u8]) -> String {
    let mut runs = Vec::new();
    let mut current = String::new();

    for &byte in bytes {
        if is_printable(byte) {
            current.push(byte as char);
        } else {
            push_run(&mut runs, &mut current);
        }
    }
    push_run(&mut runs, &mut current);

    runs.join("\n\n")
}

/// Collects printable UTF-16LE runs (ASCII code unit with a zero high
/// byte).
fn scan_utf16_runs(bytes: &[u8]) -> String {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i + 1] == 0 && is_printable(bytes[i]) {
            current.push(bytes[i] as char);
            i += 2;
        } else {
            push_run(&mut runs, &mut current);
            i += 1;
        }
    }
    push_run(&mut runs, &mut current);

    runs.join("\n\n")
}

fn push_run(runs: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if trimmed.chars().count() >= MIN_RUN_CHARS {
        runs.push(trimmed.to_owned());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_runs_are_recovered() {
        let mut bytes = vec![0u8; 32];
        bytes.extend_from_slice(b"Quarterly revenue projections");
        bytes.push(0x0D);
        bytes.extend_from_slice(b"Key assumptions and risks");
        bytes.extend_from_slice(&[0xFF, 0x00, 0x01]);

        let (text, pages) = extract(Bytes::from(bytes), "plan.doc").unwrap();
        assert!(text.contains("Quarterly revenue projections"));
        assert!(text.contains("Key assumptions and risks"));
        assert!(pages.is_none());
    }

    #[test]
    fn utf16_runs_are_recovered() {
        let mut bytes = vec![0u8; 16];
        for ch in "Business model overview".encode_utf16() {
            bytes.extend_from_slice(&ch.to_le_bytes());
        }
        bytes.extend_from_slice(&[0xD8, 0xFF]);

        let (text, _) = extract(Bytes::from(bytes), "model.doc").unwrap();
        assert!(text.contains("Business model overview"));
    }

    #[test]
    fn unreadable_content_is_an_extraction_error() {
        let bytes = Bytes::from(vec![0xD0, 0xCF, 0x11, 0xE0, 0x00, 0x01]);
        let result = extract(bytes, "garbage.doc");
        assert!(matches!(
            result,
            Err(Error::Extraction { filename, .. }) if filename == "garbage.doc"
        ));
    }
}

//! OOXML text extraction for Word and PowerPoint documents.
//!
//! Both formats are zip containers holding XML parts; text lives in `t`
//! elements (`w:t` runs inside `w:p` paragraphs for Word, `a:t` runs
//! inside `a:p` paragraphs for slides). Paragraphs are emitted separated
//! by blank lines so downstream chunking sees the same boundaries as
//! plain-text input.

use std::io::{Cursor, Read};

use bizcanvas_core::{Error, Result};
use bytes::Bytes;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

/// Extracts paragraph text from a `.docx` document.
pub(crate) async fn extract_docx(bytes: Bytes, filename: &str) -> Result<(String, Option<u32>)> {
    let name = filename.to_owned();

    tokio::task::spawn_blocking(move || {
        let mut archive = open_archive(&bytes, &name)?;
        let xml = read_part(&mut archive, "word/document.xml", &name)?;
        let paragraphs = collect_paragraphs(&xml, &name)?;
        Ok((paragraphs.join("\n\n"), None))
    })
    .await
    .map_err(|e| Error::extraction(filename, format!("extraction task failed: {e}")))?
}

/// Extracts slide text from a `.pptx` presentation.
///
/// The slide count doubles as the page count.
pub(crate) async fn extract_pptx(bytes: Bytes, filename: &str) -> Result<(String, Option<u32>)> {
    let name = filename.to_owned();

    tokio::task::spawn_blocking(move || {
        let mut archive = open_archive(&bytes, &name)?;

        let mut slides: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|part| Some((slide_number(part)?, part.to_owned())))
            .collect();
        slides.sort_by_key(|(number, _)| *number);

        let mut sections = Vec::with_capacity(slides.len());
        let slide_count = slides.len() as u32;

        for (_, part) in slides {
            let xml = read_part(&mut archive, &part, &name)?;
            let paragraphs = collect_paragraphs(&xml, &name)?;
            if !paragraphs.is_empty() {
                sections.push(paragraphs.join("\n"));
            }
        }

        Ok((sections.join("\n\n"), Some(slide_count)))
    })
    .await
    .map_err(|e| Error::extraction(filename, format!("extraction task failed: {e}")))?
}

fn open_archive<'a>(bytes: &'a [u8], filename: &str) -> Result<ZipArchive<Cursor<&'a [u8]>>> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::extraction(filename, e))
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    part: &str,
    filename: &str,
) -> Result<String> {
    let mut entry = archive
        .by_name(part)
        .map_err(|e| Error::extraction(filename, format!("missing part {part}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| Error::extraction(filename, format!("unreadable part {part}: {e}")))?;
    Ok(xml)
}

/// Parses slide part names of the form `ppt/slides/slideN.xml`.
fn slide_number(part: &str) -> Option<u32> {
    let rest = part.strip_prefix("ppt/slides/slide")?;
    rest.strip_suffix(".xml")?.parse().ok()
}

/// Pulls the text runs out of one OOXML part, grouped by paragraph.
fn collect_paragraphs(xml: &str, filename: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph.to_owned());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_run => {
                let run = t
                    .unescape()
                    .map_err(|e| Error::extraction(filename, e))?;
                current.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::extraction(filename, e)),
        }
    }

    let trailing = current.trim();
    if !trailing.is_empty() {
        paragraphs.push(trailing.to_owned());
    }

    Ok(paragraphs)
}

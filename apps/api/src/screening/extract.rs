//! Text Extractor — converts one uploaded document into normalized plain text.
//!
//! Closed dispatch over three media types: PDF (pdf-extract), DOCX (zip +
//! streaming XML), and plain text. Pure with respect to process state: reads
//! only the given bytes, performs no I/O beyond in-memory parsing.

use std::io::Read;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;

/// Media type of an uploaded document, declared by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
}

impl MediaType {
    /// Maps a declared MIME type onto the supported set.
    /// Returns `None` for anything outside it.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime == "application/pdf" {
            Some(MediaType::Pdf)
        } else if mime.contains("wordprocessingml.document") {
            Some(MediaType::Docx)
        } else if mime == "text/plain" {
            Some(MediaType::PlainText)
        } else {
            None
        }
    }
}

/// Extracts trimmed plain text from `bytes` according to the declared
/// `media_type`. Empty output after trimming counts as a failed extraction,
/// never success.
pub fn extract(bytes: &[u8], media_type: &str, file_name: &str) -> Result<String, AppError> {
    let media = MediaType::from_mime(media_type)
        .ok_or_else(|| AppError::UnsupportedFormat(media_type.to_string()))?;

    let text = match media {
        MediaType::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::ExtractionFailed {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            }
        })?,
        MediaType::Docx => docx_to_text(bytes).map_err(|reason| AppError::ExtractionFailed {
            file_name: file_name.to_string(),
            reason,
        })?,
        MediaType::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ExtractionFailed {
            file_name: file_name.to_string(),
            reason: "document contained no extractable text".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Pulls the raw text out of a DOCX container: unzip `word/document.xml`
/// and stream the `<w:t>` runs, one line per `<w:p>` paragraph.
fn docx_to_text(bytes: &[u8]) -> Result<String, String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| e.to_string())?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;

    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut text = String::new();
    let mut in_run = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_run = false,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Text(e)) if in_run => {
                let run = e.unescape().map_err(|e| e.to_string())?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

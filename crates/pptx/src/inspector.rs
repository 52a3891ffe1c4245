//! Reads slide order and the first slide's title out of a PPTX archive.

use deck_core::{DeckInfo, DeckInspector, Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Relationships part listing the slides of a presentation.
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Inspector for PPTX files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxInspector;

impl PptxInspector {
    /// Create a new PPTX inspector.
    pub fn new() -> Self {
        Self
    }

    /// Inspect a deck from any seekable reader.
    pub fn inspect_reader<R: Read + Seek>(&self, reader: R) -> Result<DeckInfo> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slides = slide_order(&read_part(&mut archive, PRESENTATION_RELS)?)?;
        log::debug!("Found {} slides", slides.len());

        let title = match slides.first() {
            Some(first) => first_text(&read_part(&mut archive, first)?)?,
            None => None,
        };

        Ok(DeckInfo {
            slide_count: slides.len(),
            title,
        })
    }
}

impl DeckInspector for PptxInspector {
    fn inspect(&self, deck: &Path) -> Result<DeckInfo> {
        let file = File::open(deck)?;
        self.inspect_reader(BufReader::new(file))
    }
}

/// Read one part of the archive as text.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut part = archive.by_name(path).map_err(|e| {
        log::debug!("Missing part {}", path);
        Error::ZipError(format!("Part '{}' not found: {}", path, e))
    })?;

    let mut content = String::new();
    part.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Archive paths of the slides, in presentation order.
fn slide_order(rels: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(rels);
    reader.trim_text(true);

    let mut slides: Vec<(String, Option<usize>)> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).into_owned(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).into_owned(),
                        _ => {}
                    }
                }

                // Only slides; layouts, masters and notes share the prefix.
                if rel_type.ends_with("/slide") {
                    let number = trailing_number(&target);
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.push((path, number));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation relationships: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// Text of the first shape on a slide that has any.
fn first_text(slide_xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(slide_xml);
    reader.trim_text(true);

    let mut in_run_text = false;
    let mut in_shape = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    in_shape = true;
                    text.clear();
                }
                b"p" if in_shape && !text.is_empty() => text.push(' '),
                b"t" if in_shape => in_run_text = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_run_text => {
                let chunk = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in slide: {}", e)))?;
                text.push_str(&chunk);
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_run_text = false,
                b"sp" => {
                    in_shape = false;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Ok(Some(trimmed.to_string()));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Number at the end of a name like "slides/slide3.xml".
fn trailing_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const SLIDE_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    const LAYOUT_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    fn slide(texts: &[&str]) -> String {
        let shapes: String = texts
            .iter()
            .map(|t| {
                format!(
                    "<p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
                    t
                )
            })
            .collect();
        format!(
            "<p:sld xmlns:p=\"p\" xmlns:a=\"a\"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
            shapes
        )
    }

    fn deck(slides: &[(&str, String)]) -> Vec<u8> {
        let rels: String = slides
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                format!(
                    "<Relationship Id=\"rId{}\" Type=\"{}\" Target=\"slides/{}\"/>",
                    i + 2,
                    SLIDE_REL,
                    name
                )
            })
            .collect();
        let rels = format!(
            "<Relationships><Relationship Id=\"rId1\" Type=\"{}\" Target=\"slideLayouts/slideLayout1.xml\"/>{}</Relationships>",
            LAYOUT_REL, rels
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        writer.start_file(PRESENTATION_RELS, options).unwrap();
        writer.write_all(rels.as_bytes()).unwrap();
        for (name, xml) in slides {
            writer.start_file(format!("ppt/slides/{}", name), options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_counts_slides_and_reads_title() {
        // Listed out of order on purpose.
        let bytes = deck(&[
            ("slide2.xml", slide(&["Decisions"])),
            ("slide10.xml", slide(&["Action items"])),
            ("slide1.xml", slide(&["Q3 Budget Review", "March 5, 2024"])),
        ]);

        let info = PptxInspector::new().inspect_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(info.slide_count, 3);
        assert_eq!(info.title.as_deref(), Some("Q3 Budget Review"));
    }

    #[test]
    fn test_deck_without_text() {
        let bytes = deck(&[("slide1.xml", slide(&[]))]);
        let info = PptxInspector::new().inspect_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(info.slide_count, 1);
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_not_a_zip() {
        let result = PptxInspector::new().inspect_reader(Cursor::new(b"%PDF-1.7".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }

    #[test]
    fn test_listed_slide_missing_from_archive() {
        let rels = format!(
            "<Relationships><Relationship Id=\"rId2\" Type=\"{}\" Target=\"slides/slide1.xml\"/></Relationships>",
            SLIDE_REL
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(PRESENTATION_RELS, FileOptions::default()).unwrap();
        writer.write_all(rels.as_bytes()).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = PptxInspector::new().inspect_reader(Cursor::new(bytes));
        assert!(matches!(result, Err(Error::ZipError(ref m)) if m.contains("ppt/slides/slide1.xml")));
    }

    #[test]
    fn test_inspect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Weekly Sync.pptx");
        std::fs::write(&path, deck(&[("slide1.xml", slide(&["Weekly Sync"]))])).unwrap();

        let info = PptxInspector::new().inspect(&path).unwrap();
        assert_eq!(info.title.as_deref(), Some("Weekly Sync"));
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("slides/slide1.xml"), Some(1));
        assert_eq!(trailing_number("slides/slide123.xml"), Some(123));
        assert_eq!(trailing_number("nodigits.xml"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}

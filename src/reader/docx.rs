//! Minimal DOCX reader.
//!
//! Reads body paragraphs (text, style name, first-run font size), tables
//! and embedded pictures from `word/document.xml`. Every body element gets
//! its index as position; pictures take the position of the element that
//! anchors them, and media files no element references are appended at the
//! end.

use super::{DocumentReader, MediaWorkspace, ReadOutput};
use crate::error::{Error, Result};
use crate::model::{RawItem, StyleHint};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const MEDIA_PREFIX: &str = "word/media/";

/// Reader for Office Open XML word-processing documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxReader;

impl DocxReader {
    /// Create a new DOCX reader.
    pub fn new() -> Self {
        Self
    }

    /// Parse a DOCX container from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<ReadOutput> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Archive(format!("Failed to open ZIP: {}", e)))?;

        let document = read_file_from_archive(&mut archive, DOCUMENT_PART)?;
        let styles = match read_file_from_archive(&mut archive, STYLES_PART) {
            Ok(xml) => parse_styles(&xml)?,
            Err(_) => HashMap::new(),
        };
        let rels = match read_file_from_archive(&mut archive, RELS_PART) {
            Ok(xml) => parse_relationships(&xml)?,
            Err(_) => HashMap::new(),
        };

        let elements = parse_body(&document)?;
        log::debug!(
            "docx body: {} elements, {} styles, {} image relationships",
            elements.len(),
            styles.len(),
            rels.len()
        );

        let mut builder = ItemBuilder {
            archive: &mut archive,
            rels: &rels,
            media: None,
            extracted: HashMap::new(),
            items: Vec::new(),
        };

        for (index, element) in elements.iter().enumerate() {
            let position = Some(index as u64);
            match element {
                DocElement::Paragraph(paragraph) => {
                    let text = paragraph.text.trim();
                    if !text.is_empty() {
                        let style_name = paragraph
                            .style_id
                            .as_ref()
                            .map(|id| styles.get(id).cloned().unwrap_or_else(|| id.clone()));
                        let style = StyleHint {
                            tagged_heading: style_name.as_deref().is_some_and(is_heading_style),
                            font_size: paragraph.font_size,
                            style_name,
                        };
                        builder.items.push(RawItem::Text {
                            text: text.to_string(),
                            style,
                            position,
                        });
                    }
                    builder.push_images(&paragraph.images, position);
                }
                DocElement::Table { rows, images } => {
                    if !rows.is_empty() {
                        builder.items.push(RawItem::Table {
                            rows: rows.clone(),
                            position,
                        });
                    }
                    builder.push_images(images, position);
                }
            }
        }

        builder.push_unreferenced_media(elements.len() as u64);

        Ok(ReadOutput {
            items: builder.items,
            media: builder.media,
        })
    }
}

impl DocumentReader for DocxReader {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<ReadOutput> {
        self.parse(Cursor::new(bytes))
    }

    fn read(&self, path: &Path) -> Result<ReadOutput> {
        self.parse(File::open(path)?)
    }
}

/// Collects items and extracts referenced media on demand.
struct ItemBuilder<'a, R: Read + Seek> {
    archive: &'a mut ZipArchive<R>,
    rels: &'a HashMap<String, String>,
    media: Option<MediaWorkspace>,
    extracted: HashMap<String, Option<PathBuf>>,
    items: Vec<RawItem>,
}

impl<'a, R: Read + Seek> ItemBuilder<'a, R> {
    fn push_images(&mut self, rel_ids: &[String], position: Option<u64>) {
        for rel_id in rel_ids {
            let path = match self.rels.get(rel_id) {
                Some(entry) => {
                    let entry = entry.clone();
                    self.extract(&entry)
                }
                None => {
                    log::warn!("picture references unknown relationship {}", rel_id);
                    None
                }
            };
            self.items.push(RawItem::Image {
                path,
                caption: None,
                description: None,
                position,
            });
        }
    }

    fn push_unreferenced_media(&mut self, position: u64) {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with(MEDIA_PREFIX) && !name.ends_with('/'))
            .filter(|name| !self.extracted.contains_key(*name))
            .map(String::from)
            .collect();
        names.sort();

        for name in names {
            let path = self.extract(&name);
            if path.is_some() {
                self.items.push(RawItem::Image {
                    path,
                    caption: None,
                    description: None,
                    position: Some(position),
                });
            }
        }
    }

    fn extract(&mut self, entry: &str) -> Option<PathBuf> {
        if let Some(path) = self.extracted.get(entry) {
            return path.clone();
        }
        let path = match extract_media(&mut *self.archive, &mut self.media, entry) {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("could not extract {}: {}", entry, e);
                None
            }
        };
        self.extracted.insert(entry.to_string(), path.clone());
        path
    }
}

fn extract_media<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    media: &mut Option<MediaWorkspace>,
    entry: &str,
) -> Result<PathBuf> {
    let mut file = archive.by_name(entry)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    if media.is_none() {
        *media = Some(MediaWorkspace::new()?);
    }
    let workspace = media
        .as_mut()
        .ok_or_else(|| Error::Other("media workspace unavailable".into()))?;
    workspace.store(entry, &data)
}

fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Archive(format!("Failed to read {}: {}", path, e)))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Style names that mark a paragraph as a heading.
fn is_heading_style(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("heading") || lower.contains("标题")
}

/// Map style ids to display names from `styles.xml`.
fn parse_styles(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut styles = HashMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if local_name(e.name().as_ref()) == b"style" => {
                current = attribute(e, b"styleId");
            }
            Event::Start(ref e) | Event::Empty(ref e)
                if local_name(e.name().as_ref()) == b"name" =>
            {
                if let (Some(id), Some(name)) = (current.as_ref(), attribute(e, b"val")) {
                    styles.insert(id.clone(), name);
                }
            }
            Event::End(ref e) if local_name(e.name().as_ref()) == b"style" => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(styles)
}

/// Map relationship ids of pictures to archive entry names.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e)
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                let external = attribute(e, b"TargetMode").is_some_and(|m| m == "External");
                if !rel_type.ends_with("/image") || external {
                    continue;
                }
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target"))
                {
                    rels.insert(id, resolve_target(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// Resolve a relationship target relative to `word/`.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut parts: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

/// A top-level element of the document body.
#[derive(Debug, Clone, PartialEq)]
enum DocElement {
    Paragraph(ParagraphData),
    Table {
        rows: Vec<Vec<String>>,
        images: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ParagraphData {
    text: String,
    style_id: Option<String>,
    font_size: Option<f32>,
    images: Vec<String>,
}

/// Streaming state while walking `document.xml`.
#[derive(Debug, Default)]
struct BodyParser {
    elements: Vec<DocElement>,
    paragraph: Option<ParagraphData>,
    table_depth: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    table_images: Vec<String>,
    in_ppr: bool,
    in_rpr: bool,
    in_text: bool,
    run_count: usize,
}

fn parse_body(xml: &str) -> Result<Vec<DocElement>> {
    let mut reader = Reader::from_str(xml);
    let mut state = BodyParser::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                state.open(e);
                state.inspect(e);
            }
            Event::Empty(ref e) => {
                state.inspect(e);
                if local_name(e.name().as_ref()) == b"tc" && state.table_depth == 1 {
                    state.row.push(String::new());
                }
            }
            Event::Text(ref e) => {
                if state.in_text {
                    let text = e.unescape().unwrap_or_default();
                    state.push_text(&text);
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                state.close(local_name(name.as_ref()));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(state.elements)
}

impl BodyParser {
    fn open(&mut self, e: &BytesStart) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.rows.clear();
                    self.table_images.clear();
                }
            }
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell.clear(),
            b"p" => {
                if self.table_depth == 0 {
                    self.paragraph = Some(ParagraphData::default());
                    self.run_count = 0;
                } else if !self.cell.is_empty() {
                    self.cell.push('\n');
                }
            }
            b"pPr" => self.in_ppr = true,
            b"rPr" => self.in_rpr = true,
            b"r" if self.table_depth == 0 => self.run_count += 1,
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    /// Handle attribute-carrying elements, whether empty or not.
    fn inspect(&mut self, e: &BytesStart) {
        let name = e.name();
        match local_name(name.as_ref()) {
            b"pStyle" if self.in_ppr && self.table_depth == 0 => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = attribute(e, b"val");
                }
            }
            b"sz" if self.in_rpr && !self.in_ppr && self.run_count == 1 => {
                let size = attribute(e, b"val").and_then(|v| v.parse::<f32>().ok());
                if let (Some(paragraph), Some(half_points)) = (self.paragraph.as_mut(), size) {
                    if paragraph.font_size.is_none() {
                        paragraph.font_size = Some(half_points / 2.0);
                    }
                }
            }
            b"tab" if !self.in_ppr => self.push_text("\t"),
            b"br" | b"cr" if !self.in_ppr => self.push_text("\n"),
            b"blip" => {
                if let Some(id) = attribute(e, b"embed") {
                    match self.paragraph.as_mut() {
                        Some(paragraph) if self.table_depth == 0 => paragraph.images.push(id),
                        _ => self.table_images.push(id),
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"pPr" => self.in_ppr = false,
            b"rPr" => self.in_rpr = false,
            b"p" if self.table_depth == 0 => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.elements.push(DocElement::Paragraph(paragraph));
                }
            }
            b"tc" if self.table_depth == 1 => {
                let cell = std::mem::take(&mut self.cell);
                self.row.push(cell.trim().to_string());
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.rows.push(row);
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    self.elements.push(DocElement::Table {
                        rows: std::mem::take(&mut self.rows),
                        images: std::mem::take(&mut self.table_images),
                    });
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.table_depth > 0 {
            self.cell.push_str(text);
        } else if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.text.push_str(text);
        }
    }
}

/// Get an attribute value by local name.
fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == name)
        .map(|attr| {
            attr.unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned())
        })
}

/// Get the local name of an XML element (strip namespace prefix).
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

//! PPTX file parser: reads a package back into a [`Presentation`].

use crate::xml::local_name;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slide_tables_core::{
    Emu, Error, Presentation, Result, Slide, SlideLayout, TableFormat, TableShape, TextAlign,
};
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new();

        let content = self.read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        let (size, slide_rel_ids) = self.read_presentation_xml(&content)?;
        if let Some((width, height)) = size {
            presentation.set_slide_size(width, height);
        }

        // Map slide rIds to part paths
        let rels = self.read_relationships(&mut archive, "ppt/_rels/presentation.xml.rels")?;
        let mut layouts: HashMap<String, SlideLayout> = HashMap::new();

        for (idx, rel_id) in slide_rel_ids.iter().enumerate() {
            let target = rels.get(rel_id).ok_or_else(|| {
                Error::PptxParseError(format!("Slide relationship '{}' not found", rel_id))
            })?;
            let slide_path = resolve_part("ppt", target);
            let slide = self.parse_slide(&mut archive, &slide_path, &mut layouts)?;
            log::debug!(
                "Read slide {} from {} ({} tables)",
                idx + 1,
                slide_path,
                slide.tables.len()
            );
            presentation.slides.push(slide);
        }

        Ok(presentation)
    }

    /// Read the slide size and the ordered slide relationship ids.
    fn read_presentation_xml(&self, xml_content: &str) -> Result<(Option<(Emu, Emu)>, Vec<String>)> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut size = None;
        let mut slide_ids = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    match local_name(e.name().as_ref()) {
                        b"sldSz" => {
                            let cx = attr_i64(e, b"cx");
                            let cy = attr_i64(e, b"cy");
                            if let (Some(cx), Some(cy)) = (cx, cy) {
                                size = Some((Emu(cx), Emu(cy)));
                            }
                        }
                        b"sldId" => {
                            if let Some(id) = attr_string(e, b"r:id") {
                                slide_ids.push(id);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing presentation.xml: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok((size, slide_ids))
    }

    /// Read a relationships part into a map of Id to Target.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<HashMap<String, String>> {
        let rels_content = self.read_file_from_archive(archive, path)?;
        let mut rels = HashMap::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target)) =
                        (attr_string(e, b"Id"), attr_string(e, b"Target"))
                    {
                        rels.insert(id, target);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships in '{}': {}",
                        path, e
                    )));
                }
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        layouts: &mut HashMap<String, SlideLayout>,
    ) -> Result<Slide> {
        let layout = self.slide_layout(archive, slide_path, layouts)?;
        let content = self.read_file_from_archive(archive, slide_path)?;

        let mut slide = Slide::new(layout);
        let (title, tables) = self.extract_shapes_from_xml(&content);
        slide.title = title.filter(|t| !t.is_empty());
        slide.tables = tables;

        Ok(slide)
    }

    /// Find the layout of a slide through its relationships. Layout parts are
    /// cached by path since most slides share a few layouts.
    fn slide_layout<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        layouts: &mut HashMap<String, SlideLayout>,
    ) -> Result<SlideLayout> {
        let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
        let rels_path = format!("{}/_rels/{}.rels", dir, file);
        let rels = self.read_relationships(archive, &rels_path)?;

        let Some(target) = rels.values().find(|t| t.contains("slideLayout")) else {
            log::warn!("{} has no layout relationship, assuming blank", slide_path);
            return Ok(SlideLayout::Blank);
        };
        let layout_path = resolve_part(dir, target);

        if let Some(layout) = layouts.get(&layout_path) {
            return Ok(*layout);
        }

        let content = self.read_file_from_archive(archive, &layout_path)?;
        let mut reader = Reader::from_str(&content);
        reader.trim_text(true);

        let mut layout = None;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldLayout" => {
                    layout = attr_string(e, b"type");
                    break;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing layout '{}': {}",
                        layout_path, e
                    )));
                }
                _ => {}
            }
        }

        let layout = match layout.as_deref().and_then(SlideLayout::from_ooxml_type) {
            Some(layout) => layout,
            None => {
                log::warn!(
                    "Unsupported layout type {:?} in {}, reading as blank",
                    layout,
                    layout_path
                );
                SlideLayout::Blank
            }
        };
        layouts.insert(layout_path, layout);
        Ok(layout)
    }

    /// Extract the title placeholder text and all tables from slide XML.
    fn extract_shapes_from_xml(&self, xml_content: &str) -> (Option<String>, Vec<TableShape>) {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut title: Option<String> = None;
        let mut tables = Vec::new();

        let mut in_shape = false;
        let mut shape_is_title = false;
        let mut shape_text = String::new();

        let mut table: Option<TableBuilder> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    match local_name(name.as_ref()) {
                        b"sp" => {
                            in_shape = true;
                            shape_is_title = false;
                            shape_text.clear();
                        }
                        b"graphicFrame" => table = Some(TableBuilder::default()),
                        b"p" if in_shape && !shape_text.is_empty() => shape_text.push('\n'),
                        _ => {}
                    }
                    if let Some(ref mut t) = table {
                        t.open(e);
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let name = e.name();
                    if in_shape && local_name(name.as_ref()) == b"ph" {
                        shape_is_title = matches!(
                            attr_string(e, b"type").as_deref(),
                            Some("title") | Some("ctrTitle")
                        );
                    }
                    if let Some(ref mut t) = table {
                        t.open(e);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().unwrap_or_default();
                    if let Some(ref mut t) = table {
                        t.text(&text);
                    } else if in_shape {
                        shape_text.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => {
                    let name = e.name();
                    match local_name(name.as_ref()) {
                        b"sp" => {
                            if shape_is_title && title.is_none() {
                                title = Some(shape_text.trim().to_string());
                            }
                            in_shape = false;
                            shape_text.clear();
                        }
                        b"graphicFrame" => {
                            if let Some(shape) = table.take().and_then(TableBuilder::finish) {
                                tables.push(shape);
                            }
                        }
                        b"tc" => {
                            if let Some(ref mut t) = table {
                                t.close_cell();
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    // Keep whatever was read before the error
                    log::warn!("XML parsing error, stopping slide early: {}", e);
                    break;
                }
                _ => {}
            }
        }

        (title, tables)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Table state collected while walking a `p:graphicFrame`.
#[derive(Debug, Default)]
struct TableBuilder {
    name: String,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
    has_table: bool,
    header_row: bool,
    banded_rows: bool,
    column_widths: Vec<Emu>,
    row_heights: Vec<Emu>,
    cells: Vec<Vec<String>>,
    cell: Option<String>,
    font_size: Option<i64>,
    alignment: Option<TextAlign>,
}

impl TableBuilder {
    fn open(&mut self, e: &BytesStart) {
        match local_name(e.name().as_ref()) {
            b"cNvPr" => {
                if let Some(name) = attr_string(e, b"name") {
                    self.name = name;
                }
            }
            // The frame's own xfrm comes before the table, so keep the first.
            b"off" if self.offset.is_none() => {
                self.offset = attr_i64(e, b"x").zip(attr_i64(e, b"y"));
            }
            b"ext" if self.extent.is_none() => {
                self.extent = attr_i64(e, b"cx").zip(attr_i64(e, b"cy"));
            }
            b"tbl" => self.has_table = true,
            b"tblPr" => {
                self.header_row = attr_flag(e, b"firstRow");
                self.banded_rows = attr_flag(e, b"bandRow");
            }
            b"gridCol" => {
                self.column_widths.push(Emu(attr_i64(e, b"w").unwrap_or(0)));
            }
            b"tr" => {
                self.row_heights.push(Emu(attr_i64(e, b"h").unwrap_or(0)));
                self.cells.push(Vec::new());
            }
            b"tc" => self.cell = Some(String::new()),
            b"p" => {
                if let Some(ref mut cell) = self.cell {
                    if !cell.is_empty() {
                        cell.push('\n');
                    }
                }
            }
            b"pPr" if self.alignment.is_none() => {
                self.alignment = attr_string(e, b"algn")
                    .as_deref()
                    .and_then(TextAlign::from_ooxml);
            }
            b"rPr" | b"endParaRPr" if self.font_size.is_none() => {
                self.font_size = attr_i64(e, b"sz");
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(ref mut cell) = self.cell {
            cell.push_str(text);
        }
    }

    fn close_cell(&mut self) {
        if let (Some(cell), Some(row)) = (self.cell.take(), self.cells.last_mut()) {
            row.push(cell);
        }
    }

    fn finish(self) -> Option<TableShape> {
        if !self.has_table {
            return None;
        }

        let (left, top) = self.offset.unwrap_or_default();
        let (width, height) = self.extent.unwrap_or_default();
        let defaults = TableFormat::default();

        Some(TableShape {
            name: self.name,
            left: Emu(left),
            top: Emu(top),
            width: Emu(width),
            height: Emu(height),
            column_widths: self.column_widths,
            format: TableFormat {
                font_size: self
                    .font_size
                    .map_or(defaults.font_size, Emu::from_centipoints),
                row_height: self.row_heights.first().copied().unwrap_or(defaults.row_height),
                alignment: self.alignment,
                header_row: self.header_row,
                banded_rows: self.banded_rows,
            },
            row_heights: self.row_heights,
            cells: self.cells,
        })
    }
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).to_string(),
        })
}

fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}

fn attr_flag(e: &BytesStart, key: &[u8]) -> bool {
    matches!(attr_string(e, key).as_deref(), Some("1") | Some("true"))
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PptxWriter;
    use slide_tables_core::{inches, pt, Dataset, TableLocation};
    use std::io::Cursor;

    #[test]
    fn test_resolve_part() {
        assert_eq!(resolve_part("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(
            resolve_part("ppt/slides", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(resolve_part("ppt/slides", "/ppt/media/a.png"), "ppt/media/a.png");
    }

    #[test]
    fn test_extract_table_from_slide_xml() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Quarterly</a:t></a:r></a:p></p:txBody></p:sp>
            <p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="3" name="Table 1"/></p:nvGraphicFramePr>
              <p:xfrm><a:off x="10" y="20"/><a:ext cx="300" cy="80"/></p:xfrm>
              <a:graphic><a:graphicData><a:tbl><a:tblPr firstRow="1" bandRow="0"/>
                <a:tblGrid><a:gridCol w="100"/><a:gridCol w="200"/></a:tblGrid>
                <a:tr h="40"><a:tc><a:txBody><a:p><a:pPr algn="r"/><a:r><a:rPr sz="900"/><a:t>R&amp;D</a:t></a:r></a:p></a:txBody></a:tc>
                  <a:tc><a:txBody><a:p><a:endParaRPr sz="900"/></a:p></a:txBody></a:tc></a:tr>
                <a:tr h="40"><a:tc><a:txBody><a:p><a:r><a:t>1</a:t></a:r></a:p></a:txBody></a:tc>
                  <a:tc><a:txBody><a:p><a:r><a:t>2</a:t></a:r></a:p></a:txBody></a:tc></a:tr>
              </a:tbl></a:graphicData></a:graphic></p:graphicFrame>
            </p:spTree></p:cSld></p:sld>"#;

        let (title, tables) = PptxParser::new().extract_shapes_from_xml(xml);

        assert_eq!(title.as_deref(), Some("Quarterly"));
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.name, "Table 1");
        assert_eq!((table.left, table.top), (Emu(10), Emu(20)));
        assert_eq!((table.width, table.height), (Emu(300), Emu(80)));
        assert_eq!(table.column_widths, vec![Emu(100), Emu(200)]);
        assert_eq!(table.cells, vec![vec!["R&D", ""], vec!["1", "2"]]);
        assert_eq!(table.format.font_size, pt(9.0));
        assert_eq!(table.format.alignment, Some(TextAlign::Right));
        assert!(table.format.header_row);
        assert!(!table.format.banded_rows);
    }

    #[test]
    fn test_written_deck_reads_back() {
        let data = Dataset::with_header(["Aa", "Bb", "Cc"], vec![vec![3, 4, 5], vec![6, 7, 8]]);
        let table = TableShape::from_dataset(
            &data,
            &TableLocation::new(inches(1.5), inches(2.0), inches(5.0)),
            &TableFormat::new()
                .with_font_size(pt(12.0))
                .with_row_height(inches(0.85)),
            Some(&[2.0, 2.0, 2.0]),
            true,
        )
        .unwrap();

        let mut prs = Presentation::new();
        prs.set_slide_size(inches(13.333), inches(7.5));
        prs.add_slide(SlideLayout::Blank).add_table(table);
        let titled = prs.add_slide(SlideLayout::TitleOnly);
        titled.set_title("Page : 1").unwrap();

        let bytes = PptxWriter::new()
            .write(&prs, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let read = PptxParser::new().parse(Cursor::new(bytes)).unwrap();

        assert_eq!(read.slide_width, inches(13.333));
        assert_eq!(read.slide_count(), 2);
        assert_eq!(read.slides[0].layout, SlideLayout::Blank);
        assert_eq!(read.slides[0].tables, prs.slides[0].tables);
        assert_eq!(read.slides[0].tables[0].cell(0, 2), Some("6"));
        assert_eq!(read.slides[1].layout, SlideLayout::TitleOnly);
        assert_eq!(read.slides[1].title.as_deref(), Some("Page : 1"));
        assert!(read.slides[1].tables.is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let result = PptxParser::new().parse(Cursor::new(b"not a pptx".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}

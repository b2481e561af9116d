//! PPTX package writer.

use crate::parts;
use crate::template;
use chrono::Utc;
use slide_tables_core::{Error, Presentation, Result, SlideLayout};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for PPTX (Office Open XML) files.
pub struct PptxWriter {
    compression: CompressionMethod,
}

impl PptxWriter {
    /// Create a writer that deflates every part.
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Use a different ZIP compression method.
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Save the presentation to a file, replacing it if it exists.
    pub fn save<P: AsRef<Path>>(&self, prs: &Presentation, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut out = self.write(prs, BufWriter::new(file))?;
        out.flush()?;

        log::info!(
            "Saved {} slides with {} tables to {}",
            prs.slide_count(),
            prs.table_count(),
            path.display()
        );
        Ok(())
    }

    /// Write the presentation as a PPTX package into `writer` and return it.
    pub fn write<W: Write + Seek>(&self, prs: &Presentation, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let slide_count = prs.slide_count();

        self.add_part(&mut zip, "[Content_Types].xml", &parts::content_types_xml(slide_count)?)?;
        self.add_part(&mut zip, "_rels/.rels", &parts::root_rels_xml()?)?;
        self.add_part(
            &mut zip,
            "docProps/core.xml",
            &parts::core_props_xml(&prs.properties, Utc::now())?,
        )?;
        self.add_part(&mut zip, "docProps/app.xml", &parts::app_props_xml(prs)?)?;

        self.add_part(&mut zip, "ppt/presentation.xml", &parts::presentation_xml(prs)?)?;
        self.add_part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels_xml(slide_count)?,
        )?;

        self.add_part(
            &mut zip,
            "ppt/slideMasters/slideMaster1.xml",
            &parts::slide_master_xml(prs)?,
        )?;
        self.add_part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels_xml()?,
        )?;

        for layout in SlideLayout::ALL {
            let number = parts::layout_part_number(layout);
            self.add_part(
                &mut zip,
                &parts::layout_part_name(number),
                &parts::slide_layout_xml(layout)?,
            )?;
            self.add_part(
                &mut zip,
                &parts::layout_rels_part_name(number),
                &parts::slide_layout_rels_xml()?,
            )?;
        }

        for (index, slide) in prs.slides.iter().enumerate() {
            let number = index + 1;
            log::debug!(
                "Writing slide {} ({} tables, layout '{}')",
                number,
                slide.tables.len(),
                slide.layout.name()
            );
            self.add_part(&mut zip, &parts::slide_part_name(number), &parts::slide_xml(slide)?)?;
            self.add_part(
                &mut zip,
                &parts::slide_rels_part_name(number),
                &parts::slide_rels_xml(slide)?,
            )?;
        }

        self.add_part(&mut zip, "ppt/theme/theme1.xml", template::theme_xml().as_bytes())?;
        self.add_part(&mut zip, "ppt/presProps.xml", template::pres_props_xml().as_bytes())?;
        self.add_part(&mut zip, "ppt/viewProps.xml", template::view_props_xml().as_bytes())?;
        self.add_part(
            &mut zip,
            "ppt/tableStyles.xml",
            template::table_styles_xml().as_bytes(),
        )?;

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }

    /// Add one part to the archive.
    fn add_part<W: Write + Seek>(&self, zip: &mut ZipWriter<W>, name: &str, data: &[u8]) -> Result<()> {
        let options = FileOptions::default().compression_method(self.compression);
        zip.start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        zip.write_all(data)?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_tables_core::{inches, Dataset, TableFormat, TableLocation, TableShape};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn two_slide_deck() -> Presentation {
        let mut prs = Presentation::new();
        for n in 0..2 {
            let data = Dataset::with_header(["x", "y"], vec![vec![n, n + 1]]);
            let table = TableShape::from_dataset(
                &data,
                &TableLocation::default(),
                &TableFormat::default(),
                None,
                false,
            )
            .unwrap();
            prs.add_slide(SlideLayout::Blank).add_table(table);
        }
        prs
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let out = PptxWriter::new()
            .write(&two_slide_deck(), Cursor::new(Vec::new()))
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(out.into_inner())).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/theme/theme1.xml",
            "ppt/tableStyles.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());

        let app = read_part(&mut archive, "docProps/app.xml");
        assert!(app.contains("<Slides>2</Slides>"));
        let slide = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert!(slide.contains("<a:t>2</a:t>"));
    }

    #[test]
    fn test_stored_compression() {
        let mut prs = Presentation::new();
        prs.set_slide_size(inches(13.333), inches(7.5));

        let out = PptxWriter::new()
            .with_compression(CompressionMethod::Stored)
            .write(&prs, Cursor::new(Vec::new()))
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(out.into_inner())).unwrap();

        let file = archive.by_name("ppt/presentation.xml").unwrap();
        assert_eq!(file.compression(), CompressionMethod::Stored);
        drop(file);

        let presentation = read_part(&mut archive, "ppt/presentation.xml");
        assert!(presentation.contains(r#"cx="12191695""#));
        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_save_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");

        PptxWriter::new().save(&two_slide_deck(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
    }
}

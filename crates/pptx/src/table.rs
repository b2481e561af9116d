//! Table helper that places one dataset as a formatted table on a slide.

use crate::writer::PptxWriter;
use slide_tables_core::{Dataset, Emu, Presentation, Result, TableFormat, TableLocation, TableShape};
use std::path::Path;

/// Renders a dataset as a table on one slide of a shared presentation.
///
/// The helper borrows the presentation for its own lifetime only, so a new
/// helper is made for each dataset.
///
/// # Example
///
/// ```no_run
/// use slide_tables_core::{inches, pt, Dataset, Presentation, SlideLayout, TableFormat};
/// use slide_tables_pptx::PptxTable;
///
/// let data = Dataset::with_header(["Aa", "Bb"], vec![vec![3, 4], vec![6, 7]]);
/// let mut prs = Presentation::new();
/// prs.add_slide(SlideLayout::Blank);
///
/// let mut tbl = PptxTable::new(&data, &mut prs);
/// tbl.set_table_location(inches(1.5), inches(2.0), inches(5.0));
/// tbl.set_formatting(TableFormat::new().with_font_size(pt(12.0)));
/// tbl.create_table(0, Some(&[1.0, 1.0]), true)?;
/// tbl.save_pptx("slide_table.pptx")?;
/// # Ok::<(), slide_tables_core::Error>(())
/// ```
pub struct PptxTable<'a> {
    data: &'a Dataset,
    prs: &'a mut Presentation,
    location: TableLocation,
    format: TableFormat,
}

impl<'a> PptxTable<'a> {
    /// Bind a dataset to a presentation with default location and formatting.
    pub fn new(data: &'a Dataset, prs: &'a mut Presentation) -> Self {
        Self {
            data,
            prs,
            location: TableLocation::default(),
            format: TableFormat::default(),
        }
    }

    /// Set where the table's top-left corner goes and how wide it is.
    pub fn set_table_location(&mut self, left: Emu, top: Emu, width: Emu) -> &mut Self {
        self.location = TableLocation::new(left, top, width);
        self
    }

    /// Set font size, row height and alignment for every cell.
    pub fn set_formatting(&mut self, format: TableFormat) -> &mut Self {
        self.format = format;
        self
    }

    pub fn location(&self) -> &TableLocation {
        &self.location
    }

    pub fn format(&self) -> &TableFormat {
        &self.format
    }

    /// Build the table and add it to slide `slide_index`.
    ///
    /// `column_weights` must have one entry per rendered column, that is per
    /// row of the dataset when `transpose` is set. Nothing is added on error.
    pub fn create_table(
        &mut self,
        slide_index: usize,
        column_weights: Option<&[f64]>,
        transpose: bool,
    ) -> Result<&TableShape> {
        let slide = self.prs.slide_mut(slide_index)?;
        let table = TableShape::from_dataset(
            self.data,
            &self.location,
            &self.format,
            column_weights,
            transpose,
        )?;

        log::debug!(
            "Creating {}x{} table on slide {} (transpose: {})",
            table.row_count(),
            table.column_count(),
            slide_index,
            transpose
        );

        let index = slide.add_table(table);
        Ok(&slide.tables[index])
    }

    /// Save the shared presentation.
    pub fn save_pptx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PptxWriter::new().save(self.prs, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_tables_core::{inches, pt, Error, SlideLayout};

    fn demo_data() -> Dataset {
        Dataset::with_header(["Aa", "Bb", "Cc"], vec![vec![3, 4, 5], vec![6, 7, 8]])
    }

    #[test]
    fn test_create_table_on_slide() {
        let data = demo_data();
        let mut prs = Presentation::new();
        prs.add_slide(SlideLayout::Blank);
        prs.add_slide(SlideLayout::Blank);

        let mut tbl = PptxTable::new(&data, &mut prs);
        tbl.set_table_location(inches(1.5), inches(2.0), inches(5.0))
            .set_formatting(
                TableFormat::new()
                    .with_font_size(pt(12.0))
                    .with_row_height(inches(0.85)),
            );
        let table = tbl.create_table(1, Some(&[2.0, 2.0, 2.0]), true).unwrap();

        assert_eq!(table.cell(0, 0), Some("Aa"));
        assert_eq!(table.cell(0, 1), Some("3"));
        assert_eq!(table.cell(2, 2), Some("8"));
        assert_eq!(table.format.font_size, pt(12.0));

        assert!(prs.slides[0].tables.is_empty());
        assert_eq!(prs.slides[1].tables.len(), 1);
    }

    #[test]
    fn test_slide_index_out_of_range() {
        let data = demo_data();
        let mut prs = Presentation::new();
        prs.add_slide(SlideLayout::Blank);

        let mut tbl = PptxTable::new(&data, &mut prs);
        assert!(matches!(
            tbl.create_table(1, None, false),
            Err(Error::SlideIndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_errors_leave_slide_untouched() {
        let ragged = Dataset::new(vec![vec!["a".into(), "b".into()], vec![1.into()]]);
        let data = demo_data();
        let mut prs = Presentation::new();
        prs.add_slide(SlideLayout::Blank);

        assert!(matches!(
            PptxTable::new(&ragged, &mut prs).create_table(0, None, false),
            Err(Error::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            PptxTable::new(&data, &mut prs).create_table(0, Some(&[1.0, 1.0]), true),
            Err(Error::ColumnWeights {
                expected: 3,
                found: 2
            })
        ));
        assert_eq!(prs.table_count(), 0);
    }

    #[test]
    fn test_save_pptx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slide_table.pptx");
        let data = demo_data();
        let mut prs = Presentation::new();
        prs.add_slide(SlideLayout::Blank);

        let mut tbl = PptxTable::new(&data, &mut prs);
        tbl.create_table(0, None, false).unwrap();
        tbl.save_pptx(&path).unwrap();

        let read = crate::PptxParser::new()
            .parse(std::fs::File::open(&path).unwrap())
            .unwrap();
        assert_eq!(read.table_count(), 1);
    }
}

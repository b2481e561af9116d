//! The presentation container: slide size, document properties and slides.

use crate::error::{Error, Result};
use crate::table::TableShape;
use crate::units::{inches, Emu};
use serde::{Deserialize, Serialize};

/// Slide layouts that can be written. Indices follow the default
/// PowerPoint template, where 5 is "Title Only" and 6 is "Blank".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlideLayout {
    /// A title placeholder and nothing else.
    TitleOnly,
    /// No placeholders.
    Blank,
}

impl SlideLayout {
    /// All layouts, in the order they are stored in a package.
    pub const ALL: [SlideLayout; 2] = [SlideLayout::TitleOnly, SlideLayout::Blank];

    /// Look up a layout by its index in the default template.
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            5 => Ok(SlideLayout::TitleOnly),
            6 => Ok(SlideLayout::Blank),
            other => Err(Error::UnsupportedLayout(other)),
        }
    }

    /// Index in the default template.
    pub fn index(self) -> usize {
        match self {
            SlideLayout::TitleOnly => 5,
            SlideLayout::Blank => 6,
        }
    }

    /// Display name of the layout.
    pub fn name(self) -> &'static str {
        match self {
            SlideLayout::TitleOnly => "Title Only",
            SlideLayout::Blank => "Blank",
        }
    }

    /// Value of the `type` attribute on `p:sldLayout`.
    pub fn ooxml_type(self) -> &'static str {
        match self {
            SlideLayout::TitleOnly => "titleOnly",
            SlideLayout::Blank => "blank",
        }
    }

    pub fn from_ooxml_type(value: &str) -> Option<Self> {
        match value {
            "titleOnly" => Some(SlideLayout::TitleOnly),
            "blank" => Some(SlideLayout::Blank),
            _ => None,
        }
    }

    pub fn has_title(self) -> bool {
        matches!(self, SlideLayout::TitleOnly)
    }
}

/// Package-level document properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub title: String,
    pub creator: String,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            title: String::from("PowerPoint Presentation"),
            creator: String::from("slide-tables"),
        }
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub layout: SlideLayout,

    /// Text of the title placeholder, if the layout has one.
    pub title: Option<String>,

    /// Tables in z-order.
    pub tables: Vec<TableShape>,
}

impl Slide {
    /// Create an empty slide with the given layout.
    pub fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            title: None,
            tables: Vec::new(),
        }
    }

    /// Set the title placeholder text.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        if !self.layout.has_title() {
            return Err(Error::NoTitlePlaceholder(self.layout.name()));
        }
        self.title = Some(title.into());
        Ok(())
    }

    /// Append a table and return its index on the slide. Unnamed tables get
    /// a name from their position.
    pub fn add_table(&mut self, mut table: TableShape) -> usize {
        let index = self.tables.len();
        if table.name.is_empty() || table.name == "Table" {
            table.name = format!("Table {}", index + 1);
        }
        self.tables.push(table);
        index
    }
}

/// An entire presentation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub slide_width: Emu,
    pub slide_height: Emu,
    pub properties: DocumentProperties,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            slide_width: inches(10.0),
            slide_height: inches(7.5),
            properties: DocumentProperties::default(),
            slides: Vec::new(),
        }
    }
}

impl Presentation {
    /// Create an empty 4:3 presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size shared by all slides.
    pub fn set_slide_size(&mut self, width: Emu, height: Emu) {
        self.slide_width = width;
        self.slide_height = height;
    }

    /// Append a slide with the given layout.
    pub fn add_slide(&mut self, layout: SlideLayout) -> &mut Slide {
        self.slides.push(Slide::new(layout));
        log::debug!(
            "Added slide {} with layout '{}'",
            self.slides.len(),
            layout.name()
        );
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slide(&self, index: usize) -> Result<&Slide> {
        let count = self.slides.len();
        self.slides
            .get(index)
            .ok_or(Error::SlideIndexOutOfRange { index, count })
    }

    pub fn slide_mut(&mut self, index: usize) -> Result<&mut Slide> {
        let count = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or(Error::SlideIndexOutOfRange { index, count })
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Total number of tables across all slides.
    pub fn table_count(&self) -> usize {
        self.slides.iter().map(|s| s.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{TableFormat, TableLocation};
    use crate::types::Dataset;

    #[test]
    fn test_layout_from_index() {
        assert_eq!(SlideLayout::from_index(6).unwrap(), SlideLayout::Blank);
        assert_eq!(SlideLayout::from_index(5).unwrap(), SlideLayout::TitleOnly);
        assert!(matches!(
            SlideLayout::from_index(1),
            Err(Error::UnsupportedLayout(1))
        ));
        for layout in SlideLayout::ALL {
            assert_eq!(SlideLayout::from_index(layout.index()).unwrap(), layout);
            assert_eq!(SlideLayout::from_ooxml_type(layout.ooxml_type()), Some(layout));
        }
    }

    #[test]
    fn test_add_slides() {
        let mut prs = Presentation::new();
        prs.set_slide_size(inches(13.333), inches(7.5));
        prs.add_slide(SlideLayout::Blank);
        prs.add_slide(SlideLayout::TitleOnly)
            .set_title("Page : 1")
            .unwrap();

        assert_eq!(prs.slide_count(), 2);
        assert_eq!(prs.slide_width, Emu(12_191_695));
        assert_eq!(prs.slide(1).unwrap().title.as_deref(), Some("Page : 1"));
        assert!(matches!(
            prs.slide(2),
            Err(Error::SlideIndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_title_requires_placeholder() {
        let mut slide = Slide::new(SlideLayout::Blank);
        assert!(matches!(
            slide.set_title("Page : 0"),
            Err(Error::NoTitlePlaceholder("Blank"))
        ));
        assert!(slide.title.is_none());
    }

    #[test]
    fn test_table_names_and_count() {
        let data = Dataset::with_header(["a"], vec![vec![1]]);
        let table = TableShape::from_dataset(
            &data,
            &TableLocation::default(),
            &TableFormat::default(),
            None,
            false,
        )
        .unwrap();

        let mut prs = Presentation::new();
        let slide = prs.add_slide(SlideLayout::Blank);
        slide.add_table(table.clone());
        slide.add_table(table);

        assert_eq!(prs.table_count(), 2);
        assert_eq!(prs.slides[0].tables[1].name, "Table 2");
    }
}

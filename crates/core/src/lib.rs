//! Core domain types for building presentations with one table per slide:
//! lengths, datasets, the presentation container and table layout.

pub mod error;
pub mod presentation;
pub mod table;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use presentation::{DocumentProperties, Presentation, Slide, SlideLayout};
pub use table::{
    column_widths, TableFormat, TableLocation, TableShape, TextAlign, FONT_SIZE_CENTIPOINTS,
};
pub use types::{CellValue, Dataset};
pub use units::{inches, pt, Emu};

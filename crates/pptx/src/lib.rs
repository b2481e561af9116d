//! PPTX (Office Open XML) backend for slide tables.
//!
//! Writes presentations as .pptx packages (ZIP archives of XML parts),
//! reads them back, and provides the table helper that lays a dataset out
//! on a slide.

mod parts;
mod template;
mod xml;

pub mod parser;
pub mod table;
pub mod writer;

pub use parser::PptxParser;
pub use table::PptxTable;
pub use writer::PptxWriter;

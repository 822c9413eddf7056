pub mod ocr;
pub mod pdf_parser;
pub mod pdf_writer;
pub mod text_processor;

pub use pdf_parser::{is_scanned_pdf, open_document, PdfTextProvider};
pub use pdf_writer::{LopdfPageWriter, PageWriter};
pub use text_processor::{collapse_whitespace, is_near_blank, non_empty_lines, title_case};

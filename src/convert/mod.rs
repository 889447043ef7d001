//! Entry points of the three conversion tools.
//!
//! | Module | Tool | Failure surface |
//! |--------|------|-----------------|
//! | [`pdf`] | PDF → page images | logged, `None` |
//! | [`images`] | images → Markdown | first error aborts the batch |
//! | [`spreadsheet`] | spreadsheets → PDF | single file raises, batch isolates per file |

pub mod images;
pub mod pdf;
pub mod spreadsheet;

pub use images::{
    convert_image_to_markdown, convert_images_to_markdown, list_images, transcribe_directory,
    transcribe_image, IMAGE_SEPARATOR,
};
pub use pdf::{convert_pdf_to_images, default_output_dir, try_convert_pdf_to_images};
pub use spreadsheet::{default_pdf_path, SpreadsheetConverter};

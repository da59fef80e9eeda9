//! Kreuzberg hOCR - word-level parser for OCR engine hOCR output
//!
//! hOCR is the HTML convention OCR engines such as Tesseract use to report what they
//! recognized. Each word is an element like
//!
//! ```html
//! <span class='ocrx_word' id='word_1_4' title='bbox 299 432 422 465; x_wconf 97.01' lang='eng' dir='ltr'>Lorem</span>
//! ```
//!
//! This crate turns such a document into a [`Page`] holding every [`Word`] in
//! document order, with its [`BoundingBox`] and confidence taken from `title`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kreuzberg_hocr::parse;
//!
//! # fn main() -> kreuzberg_hocr::Result<()> {
//! let page = parse("scan.hocr")?;
//! for word in &page {
//!     println!("{} at {:?} ({:.1}%)", word.content, word.bounding_box, word.confidence);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Sources** (`source`): path, reader or byte buffer, loaded into one buffer
//! - **Parser** (`parser`): streaming XML walk collecting word elements
//! - **Title properties** (`title`): lenient `bbox` / `x_wconf` extraction
//! - **Config** (`config`): word class and HTML tolerance settings

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod parser;
pub mod source;
pub mod title;
pub mod types;

pub use config::ParserConfig;
pub use error::{HocrError, Result};
pub use parser::{extract_words, parse, parse_with_config};
pub use source::DocumentSource;
pub use types::{BoundingBox, Page, Word};

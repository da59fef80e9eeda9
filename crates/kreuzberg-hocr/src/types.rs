use serde::{Deserialize, Serialize};

use crate::title::{bounding_box_from_title, confidence_from_title};

/// A parsed hOCR document.
///
/// Holds every word element of the document in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub words: Vec<Word>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }
}

impl IntoIterator for Page {
    type Item = Word;
    type IntoIter = std::vec::IntoIter<Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// A single recognized word.
///
/// ```html
/// <span class='ocrx_word' id='word_1_11' title='bbox 572 568 641 684; x_wconf 57' lang='eng' dir='ltr'>Foo</span>
/// ```
///
/// Attributes that are absent in the markup are empty strings. `bounding_box` and
/// `confidence` are derived from `title`, which is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// `lang` attribute (also filled from `xml:lang`).
    pub language: String,
    /// `dir` attribute.
    pub direction: String,
    /// Raw `title` attribute.
    pub title: String,
    pub id: String,
    pub class: String,
    /// Raw inner markup of the element, nested tags included.
    pub content: String,
    pub bounding_box: BoundingBox,
    pub confidence: f64,
}

impl Word {
    /// Fill `bounding_box` and `confidence` from the raw `title`.
    pub fn populate_title_fields(&mut self) {
        self.confidence = confidence_from_title(&self.title);
        self.bounding_box = bounding_box_from_title(&self.title);
    }
}

/// Pixel rectangle from the `bbox` property.
///
/// Coordinates are taken as written: nothing guarantees `x0 <= x1` or `y0 <= y1`.
/// See <http://kba.cloud/hocr-spec/1.2/#bbox>.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }
}

//! hOCR parsing.
//!
//! Streams the document with `quick-xml` and collects every word element, however
//! deeply it sits inside the page/area/paragraph/line hierarchy. Only words are
//! modelled; the surrounding structure is walked but discarded.
//!
//! # Example
//!
//! ```rust
//! use kreuzberg_hocr::parse;
//!
//! # fn example() -> kreuzberg_hocr::Result<()> {
//! let hocr = br#"<html><body><div class="ocr_page">
//!   <span class="ocrx_word" id="word_1_1" title="bbox 10 20 30 40; x_wconf 96">Hello</span>
//! </div></body></html>"#;
//!
//! let page = parse(hocr)?;
//! assert_eq!(page.words.len(), 1);
//! assert_eq!(page.words[0].content, "Hello");
//! assert_eq!(page.words[0].bounding_box.x1, 30);
//! assert_eq!(page.words[0].confidence, 96.0);
//! # Ok(())
//! # }
//! ```
use crate::config::ParserConfig;
use crate::source::{DocumentSource, load};
use crate::types::{Page, Word};
use crate::{HocrError, Result};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// HTML elements that never have content and are often left unclosed.
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta", b"param", b"source",
    b"track", b"wbr",
];

/// Parse an hOCR document with the default configuration.
///
/// Accepts anything convertible into a [`DocumentSource`]: a path (`&str`, `String`,
/// `&Path`, `PathBuf`), an open file (`&mut File`, `File`), or bytes (`&[u8]`,
/// `Vec<u8>`).
///
/// # Errors
///
/// - `HocrError::Io` if the file cannot be opened or read
/// - `HocrError::Validation` for an unsupported source
/// - `HocrError::Parsing` if the markup cannot be decoded
pub fn parse<'a>(source: impl Into<DocumentSource<'a>>) -> Result<Page> {
    parse_with_config(source, &ParserConfig::default())
}

/// Parse an hOCR document with an explicit configuration.
pub fn parse_with_config<'a>(source: impl Into<DocumentSource<'a>>, config: &ParserConfig) -> Result<Page> {
    config.validate()?;

    let source = source.into();
    let kind = source.kind();
    let bytes = load(source)?;
    tracing::debug!(source = kind, bytes = bytes.len(), "Parsing hOCR document");

    let mut words = extract_words(&bytes, config)?;
    for word in &mut words {
        word.populate_title_fields();
    }

    tracing::debug!(words = words.len(), "Parsed hOCR document");
    Ok(Page { words })
}

struct OpenWord {
    word: Word,
    depth: usize,
    content_start: usize,
}

/// Collect word elements in document order.
///
/// Only the attribute fields and raw content are filled in; `bounding_box` and
/// `confidence` stay at their defaults.
///
/// # Errors
///
/// Returns `HocrError::Parsing` for syntax errors, mismatched or missing closing
/// tags, documents without any element, and word content that is not UTF-8.
pub fn extract_words(xml_bytes: &[u8], config: &ParserConfig) -> Result<Vec<Word>> {
    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut words = Vec::new();
    let mut open_elements: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<OpenWord> = None;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_element = true;
                let is_word = current.is_none() && is_word_element(&e, &config.word_class)?;

                if config.tolerate_void_elements && is_void_element(e.local_name().as_ref()) {
                    if is_word {
                        let word = read_word_attributes(&e)?;
                        tracing::trace!(id = %word.id, "Extracted void hOCR word");
                        words.push(word);
                    }
                    continue;
                }
                open_elements.push(e.name().as_ref().to_vec());

                if is_word {
                    current = Some(OpenWord {
                        word: read_word_attributes(&e)?,
                        depth: open_elements.len(),
                        content_start: reader.buffer_position() as usize,
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                if current.is_none() && is_word_element(&e, &config.word_class)? {
                    let word = read_word_attributes(&e)?;
                    tracing::trace!(id = %word.id, "Extracted empty hOCR word");
                    words.push(word);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let top_matches = open_elements.last().is_some_and(|open| open.as_slice() == name.as_ref());
                if config.tolerate_void_elements && !top_matches && is_void_element(e.local_name().as_ref()) {
                    continue;
                }

                match open_elements.pop() {
                    Some(open) if open.as_slice() == name.as_ref() => {}
                    Some(open) => {
                        return Err(HocrError::parsing(format!(
                            "XML parsing error at position {}: closing tag </{}> does not match <{}>",
                            reader.buffer_position(),
                            String::from_utf8_lossy(name.as_ref()),
                            String::from_utf8_lossy(&open)
                        )));
                    }
                    None => {
                        return Err(HocrError::parsing(format!(
                            "XML parsing error at position {}: unexpected closing tag </{}>",
                            reader.buffer_position(),
                            String::from_utf8_lossy(name.as_ref())
                        )));
                    }
                }

                if let Some(OpenWord {
                    mut word,
                    content_start,
                    ..
                }) = current.take_if(|open| open.depth > open_elements.len())
                {
                    let content_end = end_tag_start(xml_bytes, content_start, reader.buffer_position() as usize);
                    word.content = std::str::from_utf8(&xml_bytes[content_start..content_end])
                        .map_err(|e| HocrError::parsing_with_source(format!("Word '{}' is not valid UTF-8", word.id), e))?
                        .to_string();
                    tracing::trace!(id = %word.id, "Extracted hOCR word");
                    words.push(word);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                let message = format!("XML parsing error at position {}: {}", reader.buffer_position(), e);
                return Err(HocrError::parsing_with_source(message, e));
            }
            _ => {}
        }
    }

    if !saw_element {
        return Err(HocrError::parsing("XML parsing error: document has no root element"));
    }
    if let Some(open) = open_elements.last() {
        return Err(HocrError::parsing(format!(
            "XML parsing error: unexpected end of document, <{}> is not closed",
            String::from_utf8_lossy(open)
        )));
    }

    Ok(words)
}

fn is_void_element(local_name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(local_name))
}

fn is_word_element(element: &BytesStart<'_>, word_class: &str) -> Result<bool> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(|e| HocrError::parsing_with_source(format!("Invalid attribute: {}", e), e))?;
        if attr.key.local_name().as_ref() == b"class" {
            return Ok(attribute_value(&attr.value)
                .split_whitespace()
                .any(|token| token == word_class));
        }
    }

    Ok(false)
}

fn read_word_attributes(element: &BytesStart<'_>) -> Result<Word> {
    let mut word = Word::default();

    for attr in element.attributes().with_checks(false) {
        let attr = attr.map_err(|e| HocrError::parsing_with_source(format!("Invalid attribute: {}", e), e))?;
        let field = match attr.key.local_name().as_ref() {
            b"lang" => &mut word.language,
            b"dir" => &mut word.direction,
            b"title" => &mut word.title,
            b"id" => &mut word.id,
            b"class" => &mut word.class,
            _ => continue,
        };
        *field = attribute_value(&attr.value).into_owned();
    }

    Ok(word)
}

/// Decode and unescape an attribute value, keeping the raw text if it contains
/// entities XML does not know (e.g. `&nbsp;`).
fn attribute_value(raw: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(raw);
    let unescaped = match unescape(&text) {
        Ok(Cow::Owned(unescaped)) => Some(unescaped),
        Ok(Cow::Borrowed(_)) => None,
        Err(e) => {
            tracing::warn!("Keeping raw attribute value '{}': {}", text, e);
            None
        }
    };
    unescaped.map_or(text, Cow::Owned)
}

/// Byte offset where the closing tag that ends at `end` begins.
fn end_tag_start(xml_bytes: &[u8], content_start: usize, end: usize) -> usize {
    let end = end.min(xml_bytes.len());
    memchr::memmem::rfind(&xml_bytes[content_start..end], b"</").map_or(end, |offset| content_start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(xml: &str) -> Vec<Word> {
        extract_words(xml.as_bytes(), &ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_word_attributes() {
        let xml = r#"<span class='ocrx_word' id='word_1_11' title='bbox 572 568 641 684; x_wconf 57' lang='eng' dir='ltr'>Foo</span>"#;
        let result = words(xml);

        assert_eq!(result.len(), 1);
        let word = &result[0];
        assert_eq!(word.id, "word_1_11");
        assert_eq!(word.class, "ocrx_word");
        assert_eq!(word.title, "bbox 572 568 641 684; x_wconf 57");
        assert_eq!(word.language, "eng");
        assert_eq!(word.direction, "ltr");
        assert_eq!(word.content, "Foo");
    }

    #[test]
    fn test_title_fields_left_at_default() {
        let xml = r#"<span class="ocrx_word" title="bbox 1 2 3 4; x_wconf 90">a</span>"#;
        let word = &words(xml)[0];
        assert_eq!(word.confidence, 0.0);
        assert_eq!(word.bounding_box.x1, 0);
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let word = &words(r#"<span class="ocrx_word">bare</span>"#)[0];
        assert_eq!(word.language, "");
        assert_eq!(word.direction, "");
        assert_eq!(word.title, "");
        assert_eq!(word.id, "");
    }

    #[test]
    fn test_deeply_nested_words_in_order() {
        let xml = r#"<html><body><div class="ocr_page"><div class="ocr_carea"><p class="ocr_par">
            <span class="ocr_line"><span class="ocrx_word" id="w1">One</span> <span class="ocrx_word" id="w2">two</span></span>
            <span class="ocr_line"><span class="ocrx_word" id="w3">three</span></span>
        </p></div></div><span class="ocrx_word" id="w4">four</span></body></html>"#;

        let ids: Vec<String> = words(xml).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["w1", "w2", "w3", "w4"]);
    }

    #[test]
    fn test_content_keeps_inner_markup() {
        let xml = r#"<p><span class="ocrx_word" id="w1"><strong>Bold</strong> &amp; more</span></p>"#;
        assert_eq!(words(xml)[0].content, "<strong>Bold</strong> &amp; more");
    }

    #[test]
    fn test_content_keeps_whitespace() {
        let xml = "<p><span class=\"ocrx_word\">  Padded\n</span></p>";
        assert_eq!(words(xml)[0].content, "  Padded\n");
    }

    #[test]
    fn test_nested_word_stays_in_outer_content() {
        let xml = r#"<p><span class="ocrx_word" id="outer">a<span class="ocrx_word" id="inner">b</span></span></p>"#;
        let result = words(xml);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "outer");
        assert_eq!(result[0].content, r#"a<span class="ocrx_word" id="inner">b</span>"#);
    }

    #[test]
    fn test_empty_word_element() {
        let result = words(r#"<p><span class="ocrx_word" id="w1"/></p>"#);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "");
    }

    #[test]
    fn test_class_token_match() {
        let xml = r#"<p><span class="ocrx_word bold">a</span><span class="ocrx_words">b</span><span class="ocr_line">c</span></p>"#;
        let result = words(xml);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].class, "ocrx_word bold");
    }

    #[test]
    fn test_custom_word_class() {
        let config = ParserConfig {
            word_class: "ocr_line".to_string(),
            ..Default::default()
        };
        let xml = r#"<p><span class="ocr_line" id="l1"><span class="ocrx_word">a</span></span></p>"#;
        let result = extract_words(xml.as_bytes(), &config).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "l1");
    }

    #[test]
    fn test_xml_lang_and_entities() {
        let xml = r#"<p><span class="ocrx_word" xml:lang="deu" title="bbox 1 2 3 4; note &quot;x&quot;">Ä</span></p>"#;
        let word = &words(xml)[0];
        assert_eq!(word.language, "deu");
        assert_eq!(word.title, r#"bbox 1 2 3 4; note "x""#);
        assert_eq!(word.content, "Ä");
    }

    #[test]
    fn test_unknown_entity_keeps_raw_value() {
        let xml = r#"<p><span class="ocrx_word" title="bbox 1 2 3 4&nbsp;">x</span></p>"#;
        assert_eq!(words(xml)[0].title, "bbox 1 2 3 4&nbsp;");
    }

    #[test]
    fn test_void_elements_tolerated() {
        let xml = r#"<html><head><meta charset="utf-8"><title>t</title></head>
            <body><p><span class="ocrx_word">a<br>b</span></p></body></html>"#;
        let result = words(xml);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, "a<br>b");
    }

    #[test]
    fn test_unclosed_void_word_is_extracted() {
        let xml = r#"<p><img class="ocrx_word" id="w1" title="bbox 1 2 3 4"><span class="ocrx_word" id="w2">b</span></p>"#;
        let result = words(xml);
        let ids: Vec<&str> = result.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
        assert_eq!(result[0].title, "bbox 1 2 3 4");
        assert_eq!(result[0].content, "");
    }

    #[test]
    fn test_duplicate_attributes_tolerated() {
        let xml = r#"<p><span id="a" id="b" class="ocrx_word">x</span><span class="ocrx_word" lang="eng" lang="deu">y</span></p>"#;
        let result = words(xml);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "b");
        assert_eq!(result[1].language, "deu");
    }

    #[test]
    fn test_void_element_with_explicit_close() {
        let xml = r#"<html><head><meta name="ocr-system" content="tesseract"></meta></head><body/></html>"#;
        assert!(words(xml).is_empty());
    }

    #[test]
    fn test_void_elements_strict() {
        let config = ParserConfig {
            tolerate_void_elements: false,
            ..Default::default()
        };
        let xml = b"<html><head><meta charset=\"utf-8\"></head></html>";
        let result = extract_words(xml, &config);
        assert!(matches!(result.unwrap_err(), HocrError::Parsing { .. }));
    }

    #[test]
    fn test_no_words_is_ok() {
        assert!(words("<html><body><p>nothing here</p></body></html>").is_empty());
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let result = extract_words(b"<html><body></html>", &ParserConfig::default());
        assert!(matches!(result.unwrap_err(), HocrError::Parsing { .. }));
    }

    #[test]
    fn test_unclosed_element() {
        let result = extract_words(b"<html><body><p>", &ParserConfig::default());
        assert!(matches!(result.unwrap_err(), HocrError::Parsing { .. }));
    }

    #[test]
    fn test_plain_text_is_rejected() {
        let result = extract_words(b"This is not an hOCR file.", &ParserConfig::default());
        assert!(matches!(result.unwrap_err(), HocrError::Parsing { .. }));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = extract_words(b"", &ParserConfig::default());
        assert!(matches!(result.unwrap_err(), HocrError::Parsing { .. }));
    }

    #[test]
    fn test_end_tag_start() {
        let xml = b"<a>text</a>";
        assert_eq!(end_tag_start(xml, 3, xml.len()), 7);
    }
}

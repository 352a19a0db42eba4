//! Pull-based element event source over `quick-xml`.
//!
//! [`ElementEvents`] yields one [`ElementEvent`] per start tag (including
//! empty-element tags) in document order. The sequence is finite, lazy and
//! cannot be restarted: after the end of the document or the first error it
//! only returns `None`.

use crate::error::{Result, XmlToTextError};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;

/// One opening tag and its attribute values, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEvent {
    pub name: String,
    pub values: Vec<String>,
}

pub struct ElementEvents<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    source: String,
    depth: usize,
    elements_seen: usize,
    finished: bool,
}

impl<R: BufRead> ElementEvents<R> {
    /// `source` names the input in diagnostics.
    pub fn new<S: Into<String>>(reader: R, source: S) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::with_capacity(8 * 1024),
            source: source.into(),
            depth: 0,
            elements_seen: 0,
            finished: false,
        }
    }

    pub fn elements_seen(&self) -> usize {
        self.elements_seen
    }

    /// Pulls the next element event, or `Ok(None)` at the end of the document.
    pub fn next_event(&mut self) -> Result<Option<ElementEvent>> {
        if self.finished {
            return Ok(None);
        }

        let result = self.read_next();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn read_next(&mut self) -> Result<Option<ElementEvent>> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => return Err(self.parse_error(e.to_string())),
            };

            match event {
                Event::Start(start) => {
                    let element = Self::element_event(&self.reader, &start);
                    let element = element.map_err(|e| self.content_error(e))?;
                    self.depth += 1;
                    self.elements_seen += 1;
                    return Ok(Some(element));
                }
                Event::Empty(start) => {
                    let element = Self::element_event(&self.reader, &start);
                    let element = element.map_err(|e| self.content_error(e))?;
                    self.elements_seen += 1;
                    return Ok(Some(element));
                }
                // Content is not reported, but it must still decode
                Event::Text(text) => {
                    let checked = Self::check_text(&self.reader, &text);
                    checked.map_err(|e| self.content_error(e))?;
                }
                Event::CData(cdata) => {
                    let checked = Self::decode(&self.reader, &cdata).map(|_| ());
                    checked.map_err(|e| self.content_error(e))?;
                }
                Event::Comment(comment) => {
                    let checked = Self::decode(&self.reader, &comment).map(|_| ());
                    checked.map_err(|e| self.content_error(e))?;
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(self.parse_error(format!(
                            "unexpected end of document, {} element(s) not closed",
                            self.depth
                        )));
                    }
                    if self.elements_seen == 0 {
                        return Err(self.parse_error("document contains no elements".to_string()));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn element_event(
        reader: &Reader<R>,
        start: &BytesStart<'_>,
    ) -> std::result::Result<ElementEvent, ContentError> {
        let name = Self::decode(reader, start.name().as_ref())?.into_owned();

        // Duplicate names are reported as they appear
        let mut values = Vec::new();
        for attr in start.attributes().with_checks(false) {
            let attr = attr.map_err(|e| ContentError::Markup(e.to_string()))?;
            let raw = Self::decode(reader, &attr.value)?;
            let normalized = normalize_attribute_whitespace(&raw);
            let value = unescape(&normalized).map_err(|e| ContentError::Markup(e.to_string()))?;
            values.push(value.into_owned());
        }

        Ok(ElementEvent { name, values })
    }

    fn check_text(reader: &Reader<R>, raw: &[u8]) -> std::result::Result<(), ContentError> {
        let text = Self::decode(reader, raw)?;
        unescape(&text).map_err(|e| ContentError::Markup(e.to_string()))?;
        Ok(())
    }

    fn decode<'b>(reader: &Reader<R>, raw: &'b [u8]) -> std::result::Result<Cow<'b, str>, ContentError> {
        reader
            .decoder()
            .decode(raw)
            .map_err(|e| ContentError::Encoding(e.to_string()))
    }

    fn content_error(&self, error: ContentError) -> XmlToTextError {
        match error {
            ContentError::Encoding(message) => XmlToTextError::Encoding {
                path: self.source.clone(),
                message: format!("at byte {}: {}", self.reader.buffer_position(), message),
            },
            ContentError::Markup(message) => self.parse_error(message),
        }
    }

    fn parse_error(&self, message: String) -> XmlToTextError {
        XmlToTextError::Parse {
            path: self.source.clone(),
            position: self.reader.buffer_position() as u64,
            message,
        }
    }
}

enum ContentError {
    Encoding(String),
    Markup(String),
}

/// Replaces literal tabs and line breaks in a raw attribute value with spaces.
///
/// A CRLF pair becomes a single space. Characters written as references
/// (`&#10;`) are untouched because this runs before unescaping.
fn normalize_attribute_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }

    let mut normalized = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                normalized.push(' ');
            }
            '\t' | '\n' => normalized.push(' '),
            other => normalized.push(other),
        }
    }
    Cow::Owned(normalized)
}

impl<R: BufRead> Iterator for ElementEvents<R> {
    type Item = Result<ElementEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

use crate::config::FilterConfig;
use crate::extractor::LINE_SEPARATOR;
use std::borrow::Cow;

/// Attribute value treated as absent.
pub const NULL_VALUE: &str = "null";

/// Separator placed between attribute positions.
pub const VALUE_SEPARATOR: &str = ", ";

/// Append-only output lines of a single extraction run.
///
/// Created empty by the extractor, filled in document order and consumed by
/// value once the run is complete.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    lines: Vec<String>,
    elements_seen: usize,
}

impl ResultAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_line(&mut self, line: String) {
        self.lines.push(line);
    }

    pub(crate) fn set_elements_seen(&mut self, count: usize) {
        self.elements_seen = count;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of element events the run produced, emitted or not.
    pub fn elements_seen(&self) -> usize {
        self.elements_seen
    }

    /// Full text, every line terminated by the platform line separator.
    pub fn into_text(self) -> String {
        let capacity = self
            .lines
            .iter()
            .map(|line| line.len() + LINE_SEPARATOR.len())
            .sum();

        let mut text = String::with_capacity(capacity);
        for line in self.lines {
            text.push_str(&line);
            text.push_str(LINE_SEPARATOR);
        }
        text
    }
}

/// Turns element events into output lines.
pub struct ExtractionCallback<'a> {
    filter: &'a FilterConfig,
    accumulator: ResultAccumulator,
    elements_seen: usize,
}

impl<'a> ExtractionCallback<'a> {
    pub fn new(filter: &'a FilterConfig) -> Self {
        Self {
            filter,
            accumulator: ResultAccumulator::new(),
            elements_seen: 0,
        }
    }

    pub fn on_element_start<S: AsRef<str>>(&mut self, values: &[S]) {
        self.elements_seen += 1;

        let line = build_line(values);
        if self.filter.admits(values) {
            self.accumulator.push_line(line);
        }
    }

    pub fn elements_seen(&self) -> usize {
        self.elements_seen
    }

    pub fn finish(mut self) -> ResultAccumulator {
        self.accumulator.set_elements_seen(self.elements_seen);
        self.accumulator
    }
}

/// Joins attribute values into one line body, without terminator.
///
/// The separator goes before every position except the first, including
/// positions whose value is [`NULL_VALUE`] and contributes no text. So
/// `["null", "a"]` becomes `", a"`.
pub fn build_line<S: AsRef<str>>(values: &[S]) -> String {
    let mut line = String::new();

    for (index, value) in values.iter().enumerate() {
        if index != 0 {
            line.push_str(VALUE_SEPARATOR);
        }

        let value = value.as_ref();
        if value != NULL_VALUE {
            line.push_str(&collapse_line_breaks(value));
        }
    }

    line
}

/// Replaces `\r\n`, then any remaining `\n`, with a single space.
pub fn collapse_line_breaks(value: &str) -> Cow<'_, str> {
    if !value.contains('\n') {
        return Cow::Borrowed(value);
    }

    Cow::Owned(value.replace("\r\n", " ").replace('\n', " "))
}

use crate::config::Config;
use crate::error::{Result, XmlToTextError};
use crate::extractor::callback::{ExtractionCallback, ResultAccumulator};
use crate::extractor::events::ElementEvents;
use crate::extractor::split_lines;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

/// Produces the result accumulator for one input.
pub struct Extractor<'a> {
    config: &'a Config,
    buffer_size: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            buffer_size: 64 * 1024,
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096);
        self
    }

    /// Extracts from a file.
    ///
    /// `progress_callback` receives the running number of element events.
    pub fn extract_file<P: AsRef<Path>>(
        &self,
        path: P,
        progress_callback: Option<&dyn Fn(usize)>,
    ) -> Result<ResultAccumulator> {
        let path = path.as_ref();
        let file = open_input(path)?;
        let reader = BufReader::with_capacity(self.buffer_size, file);

        self.extract_from_reader(reader, &path.display().to_string(), progress_callback)
    }

    /// Extracts from any buffered source. `source` names it in diagnostics.
    pub fn extract_from_reader<R: BufRead>(
        &self,
        reader: R,
        source: &str,
        progress_callback: Option<&dyn Fn(usize)>,
    ) -> Result<ResultAccumulator> {
        if self.config.parse_xml {
            self.parse_elements(reader, source, progress_callback)
        } else {
            read_raw(reader, source)
        }
    }

    fn parse_elements<R: BufRead>(
        &self,
        reader: R,
        source: &str,
        progress_callback: Option<&dyn Fn(usize)>,
    ) -> Result<ResultAccumulator> {
        let mut callback = ExtractionCallback::new(&self.config.filter);

        for event in ElementEvents::new(reader, source) {
            let event = event?;
            callback.on_element_start(&event.values);

            if let Some(progress) = progress_callback {
                progress(callback.elements_seen());
            }
        }

        Ok(callback.finish())
    }
}

/// Extracts `path` with `config`, without progress reporting.
pub fn extract<P: AsRef<Path>>(path: P, config: &Config) -> Result<ResultAccumulator> {
    Extractor::new(config).extract_file(path, None)
}

/// Opens the input, telling a missing file apart from an unreadable one.
pub(crate) fn open_input(path: &Path) -> Result<fs::File> {
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => XmlToTextError::InputNotFound {
            path: display.clone(),
        },
        _ => XmlToTextError::InputUnreadable {
            path: display.clone(),
            source: e,
        },
    })?;

    if metadata.is_dir() {
        return Err(XmlToTextError::InputUnreadable {
            path: display,
            source: std::io::Error::new(ErrorKind::Other, "is a directory"),
        });
    }

    fs::File::open(path).map_err(|e| XmlToTextError::InputUnreadable {
        path: display,
        source: e,
    })
}

fn read_raw<R: BufRead>(mut reader: R, source: &str) -> Result<ResultAccumulator> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| XmlToTextError::InputUnreadable {
            path: source.to_string(),
            source: e,
        })?;

    // Undecodable bytes become U+FFFD
    let text = String::from_utf8_lossy(&bytes);

    let mut accumulator = ResultAccumulator::new();
    for line in split_lines(&text) {
        accumulator.push_line(line.to_string());
    }
    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn extract_str(xml: &str, config: &Config) -> Result<ResultAccumulator> {
        Extractor::new(config).extract_from_reader(xml.as_bytes(), "inline.xml", None)
    }

    #[test]
    fn test_one_line_per_element() {
        let xml = r#"<catalog id="c1">
            <book isbn="1" title="One"/>
            <book isbn="2" title="Two"><note/></book>
        </catalog>"#;

        let accumulator = extract_str(xml, &Config::default()).unwrap();
        assert_eq!(accumulator.lines(), &["c1", "1, One", "2, Two", ""]);
        assert_eq!(accumulator.elements_seen(), 4);
    }

    #[test]
    fn test_concrete_scenario() {
        let accumulator = extract_str(r#"<a x="1" y="2"/><b z="null"/>"#, &Config::default()).unwrap();
        assert_eq!(accumulator.lines(), &["1, 2", ""]);
    }

    #[test]
    fn test_multiline_attribute_values_are_collapsed() {
        // Character references survive attribute-value normalization
        let xml = r#"<a note="first&#13;&#10;second&#10;third"/>"#;
        let accumulator = extract_str(xml, &Config::default()).unwrap();
        assert_eq!(accumulator.lines(), &["first second third"]);
    }

    #[test]
    fn test_filtering_gates_emission() {
        let config = Config::default().with_filter(FilterConfig::with_search_values(["test"]));
        let xml = r#"<root><e a="foo" b="contest"/><e a="foo" b="bar"/></root>"#;

        let accumulator = extract_str(xml, &config).unwrap();
        assert_eq!(accumulator.lines(), &["foo, contest"]);
        assert_eq!(accumulator.elements_seen(), 3);
    }

    #[test]
    fn test_malformed_xml_produces_no_accumulator() {
        let result = extract_str("<a><b></a>", &Config::default());
        assert!(matches!(result, Err(XmlToTextError::Parse { .. })));
    }

    #[test]
    fn test_raw_mode_copies_lines() {
        let config = Config::default().with_parse_xml(false);
        let accumulator = extract_str("<a x=\"1\"/>\r\n<b/>\n", &config).unwrap();
        assert_eq!(accumulator.lines(), &["<a x=\"1\"/>", "<b/>"]);
        assert_eq!(accumulator.elements_seen(), 0);
    }

    #[test]
    fn test_raw_mode_replaces_invalid_utf8() {
        let config = Config::default().with_parse_xml(false);
        let accumulator = Extractor::new(&config)
            .extract_from_reader(&b"<a\xff/>\nok"[..], "bin.xml", None)
            .unwrap();
        assert_eq!(accumulator.lines(), &["<a\u{FFFD}/>", "ok"]);
    }

    #[test]
    fn test_parse_mode_rejects_invalid_utf8() {
        let result = Extractor::new(&Config::default())
            .extract_from_reader(&b"<a k=\"v\">\xff\xfe</a>"[..], "bin.xml", None);
        assert!(matches!(result, Err(XmlToTextError::Encoding { .. })));
    }

    #[test]
    fn test_literal_carriage_return_keeps_one_line_per_element() {
        let accumulator =
            extract_str("<r><a v=\"x\ry\"/><b w=\"z\"/></r>", &Config::default()).unwrap();
        assert_eq!(accumulator.lines(), &["", "x y", "z"]);
        assert_eq!(accumulator.elements_seen(), 3);
    }

    #[test]
    fn test_progress_callback_counts_events() {
        let config = Config::default();
        let last = Cell::new(0);
        let progress = |count: usize| last.set(count);

        Extractor::new(&config)
            .extract_from_reader("<a><b/><c/></a>".as_bytes(), "p.xml", Some(&progress))
            .unwrap();

        assert_eq!(last.get(), 3);
    }

    #[test]
    fn test_extract_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("input.xml");
        fs::write(&path, r#"<?xml version="1.0"?><r k="v"/>"#).unwrap();

        let accumulator = extract(&path, &Config::default()).unwrap();
        assert_eq!(accumulator.lines(), &["v"]);
    }

    #[test]
    fn test_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = extract(temp_dir.path().join("missing.xml"), &Config::default());
        assert!(matches!(result, Err(XmlToTextError::InputNotFound { .. })));
    }

    #[test]
    fn test_directory_input_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let result = extract(temp_dir.path(), &Config::default());
        assert!(matches!(result, Err(XmlToTextError::InputUnreadable { .. })));
    }
}

pub mod callback;
pub mod driver;
pub mod events;
pub mod output_manager;

pub use callback::{build_line, collapse_line_breaks, ExtractionCallback, ResultAccumulator};
pub use driver::{extract, Extractor};
pub use events::{ElementEvent, ElementEvents};
pub use output_manager::{OutputManager, WrittenOutput};

/// Platform-native line separator.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Splits text into lines on `\r\n`, `\n` or a lone `\r`.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\rb\n\nc"), vec!["a", "b", "", "c"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_lines_keeps_multibyte_text() {
        assert_eq!(split_lines("größe\r\nλ"), vec!["größe", "λ"]);
    }
}

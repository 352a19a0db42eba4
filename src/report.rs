use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub parse_xml: bool,
    pub filtering: bool,
    /// Element events seen; zero in raw mode.
    pub elements_seen: usize,
    pub lines_written: usize,
    pub duration: Duration,
    pub converted_at: DateTime<Utc>,
}

impl ConversionReport {
    /// Element events dropped by the filter.
    pub fn lines_filtered(&self) -> usize {
        if self.parse_xml {
            self.elements_seen.saturating_sub(self.lines_written)
        } else {
            0
        }
    }

    pub fn display_summary(&self) -> String {
        if self.parse_xml {
            format!(
                "{} elements, {} lines written, {} filtered",
                self.elements_seen,
                self.lines_written,
                self.lines_filtered()
            )
        } else {
            format!("{} lines copied verbatim", self.lines_written)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(parse_xml: bool, elements_seen: usize, lines_written: usize) -> ConversionReport {
        ConversionReport {
            input_path: PathBuf::from("/data/in.xml"),
            output_path: PathBuf::from("/data/in.xml.txt"),
            parse_xml,
            filtering: true,
            elements_seen,
            lines_written,
            duration: Duration::from_millis(12),
            converted_at: Utc::now(),
        }
    }

    #[test]
    fn test_lines_filtered() {
        assert_eq!(report(true, 10, 4).lines_filtered(), 6);
        assert_eq!(report(false, 0, 4).lines_filtered(), 0);
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(
            report(true, 3, 2).display_summary(),
            "3 elements, 2 lines written, 1 filtered"
        );
        assert_eq!(report(false, 0, 7).display_summary(), "7 lines copied verbatim");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let json = serde_json::to_value(report(true, 1, 1)).unwrap();
        assert_eq!(json["output_path"], "/data/in.xml.txt");
        assert_eq!(json["elements_seen"], 1);
    }
}

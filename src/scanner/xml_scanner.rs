use crate::error::{Result, XmlToTextError};
use crate::scanner::file_filter::FileFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A candidate input offered by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl XmlFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            filename,
            size,
        }
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Lists the XML files directly inside a directory.
pub struct XmlScanner {
    filter: FileFilter,
}

impl XmlScanner {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Lists XML files in `root` (not its subdirectories), sorted by path.
    ///
    /// Unreadable entries are skipped; an empty result is not an error.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<XmlFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(XmlToTextError::InputUnreadable {
                path: root_path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
            });
        }

        let walker = WalkDir::new(root_path).max_depth(1).follow_links(true);

        let mut files: Vec<XmlFile> = walker
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && self.filter.is_xml_file(entry.path()))
            .map(|entry| {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                XmlFile::new(entry.into_path(), size)
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(files)
    }
}

impl Default for XmlScanner {
    fn default() -> Self {
        Self::new(FileFilter::default())
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

use std::path::Path;

/// Extension accepted by the picker, compared case-insensitively.
pub const XML_EXTENSION: &str = "xml";

/// Decides which directory entries the file picker offers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFilter;

impl FileFilter {
    pub fn new() -> Self {
        Self
    }

    /// Visible files with an `.xml` extension in any letter case.
    pub fn is_xml_file(&self, path: &Path) -> bool {
        if is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(XML_EXTENSION))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

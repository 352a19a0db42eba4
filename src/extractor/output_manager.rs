use crate::error::{Result, XmlToTextError};
use crate::extractor::{split_lines, LINE_SEPARATOR};
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Extension appended to the input path.
pub const OUTPUT_EXTENSION: &str = "txt";

/// A finished output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub path: PathBuf,
    pub lines: usize,
}

/// Writes the extracted text next to the source file.
///
/// The target is `<input>.txt`, or `<input>.<N>.txt` for the smallest free
/// `N >= 2`. Existing files are never overwritten.
pub struct OutputManager {
    input_path: PathBuf,
    buffer_size: usize,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            buffer_size: 64 * 1024,
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096);
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Output path for attempt `index`; 1 is the unnumbered name.
    pub fn candidate_path(&self, index: u32) -> PathBuf {
        let mut name = OsString::from(self.input_path.as_os_str());
        if index > 1 {
            name.push(format!(".{}", index));
        }
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        PathBuf::from(name)
    }

    /// First candidate path that does not exist yet.
    pub fn resolve_output_path(&self) -> PathBuf {
        self.resolve_from(1).1
    }

    fn resolve_from(&self, first: u32) -> (u32, PathBuf) {
        let mut index = first;
        loop {
            let candidate = self.candidate_path(index);
            if !candidate.exists() {
                return (index, candidate);
            }
            index += 1;
        }
    }

    /// Writes `content` line by line with the platform separator.
    pub fn write(&self, content: &str) -> Result<WrittenOutput> {
        let (path, file) = self.create_output_file()?;

        match self.write_lines(file, content) {
            Ok(lines) => Ok(WrittenOutput { path, lines }),
            Err(source) => {
                // Leave nothing half-written behind
                let _ = fs::remove_file(&path);
                Err(XmlToTextError::OutputWrite {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    fn create_output_file(&self) -> Result<(PathBuf, fs::File)> {
        let mut first = 1;
        loop {
            let (index, path) = self.resolve_from(first);

            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                // Someone created it between the check and the open
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    first = index + 1;
                }
                Err(source) => {
                    return Err(XmlToTextError::OutputWrite {
                        path: path.display().to_string(),
                        source,
                    })
                }
            }
        }
    }

    fn write_lines(&self, file: fs::File, content: &str) -> std::io::Result<usize> {
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        let lines = split_lines(content);

        for line in &lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(LINE_SEPARATOR.as_bytes())?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(lines.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input_in(temp_dir: &TempDir) -> PathBuf {
        let input = temp_dir.path().join("data.xml");
        fs::write(&input, "<a/>").unwrap();
        input
    }

    #[test]
    fn test_candidate_paths() {
        let manager = OutputManager::new("/tmp/data.xml");
        assert_eq!(manager.candidate_path(1), PathBuf::from("/tmp/data.xml.txt"));
        assert_eq!(manager.candidate_path(2), PathBuf::from("/tmp/data.xml.2.txt"));
        assert_eq!(manager.candidate_path(10), PathBuf::from("/tmp/data.xml.10.txt"));
    }

    #[test]
    fn test_repeated_writes_never_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let input = input_in(&temp_dir);
        let manager = OutputManager::new(&input);

        let first = manager.write("one\n").unwrap();
        let second = manager.write("two\n").unwrap();
        let third = manager.write("three\n").unwrap();

        assert_eq!(first.path, temp_dir.path().join("data.xml.txt"));
        assert_eq!(second.path, temp_dir.path().join("data.xml.2.txt"));
        assert_eq!(third.path, temp_dir.path().join("data.xml.3.txt"));
        assert_eq!(fs::read_to_string(&first.path).unwrap(), format!("one{}", LINE_SEPARATOR));
    }

    #[test]
    fn test_resolve_fills_smallest_gap() {
        let temp_dir = TempDir::new().unwrap();
        let input = input_in(&temp_dir);
        let manager = OutputManager::new(&input);

        fs::write(manager.candidate_path(1), "").unwrap();
        fs::write(manager.candidate_path(3), "").unwrap();

        assert_eq!(manager.resolve_output_path(), manager.candidate_path(2));
    }

    #[test]
    fn test_write_normalizes_line_breaks() {
        let temp_dir = TempDir::new().unwrap();
        let manager = OutputManager::new(input_in(&temp_dir));

        let written = manager.write("a\r\nb\rc\n\nd").unwrap();

        let expected = ["a", "b", "c", "", "d"]
            .iter()
            .map(|line| format!("{}{}", line, LINE_SEPARATOR))
            .collect::<String>();
        assert_eq!(written.lines, 5);
        assert_eq!(fs::read_to_string(written.path).unwrap(), expected);
    }

    #[test]
    fn test_empty_content_creates_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = OutputManager::new(input_in(&temp_dir));

        let written = manager.write("").unwrap();
        assert_eq!(written.lines, 0);
        assert!(written.path.exists());
        assert_eq!(fs::read(written.path).unwrap().len(), 0);
    }

    #[test]
    fn test_missing_directory_is_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        let manager = OutputManager::new(temp_dir.path().join("nope").join("data.xml"));

        let result = manager.write("x\n");
        assert!(matches!(result, Err(XmlToTextError::OutputWrite { .. })));
    }
}

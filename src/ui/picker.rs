//! Interactive input selection for runs started without a path.

use crate::error::{Result, XmlToTextError};
use crate::scanner::{XmlFile, XmlScanner};
use console::{style, Term};
use std::path::{Path, PathBuf};

pub struct FilePicker {
    directory: PathBuf,
    scanner: XmlScanner,
    term: Term,
}

impl FilePicker {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            scanner: XmlScanner::default(),
            term: Term::stderr(),
        }
    }

    /// Lists XML files and asks for a number or a path.
    ///
    /// Cancelling, an invalid answer or a non-interactive terminal all yield
    /// [`XmlToTextError::NoFileSelected`].
    pub fn pick(&self) -> Result<PathBuf> {
        if !self.term.is_term() {
            return Err(XmlToTextError::NoFileSelected);
        }

        let files = self.scanner.scan_directory(&self.directory)?;
        self.print_choices(&files)?;

        let prompt = if files.is_empty() {
            "Path to XML file (Enter to cancel): ".to_string()
        } else {
            format!("Select 1-{} or enter a path (Enter to cancel): ", files.len())
        };
        self.term.write_str(&prompt)?;

        // EOF and interrupted reads count as cancel
        let answer = match self.term.read_line() {
            Ok(answer) => answer,
            Err(_) => return Err(XmlToTextError::NoFileSelected),
        };

        resolve_choice(&files, &answer, &self.directory).ok_or(XmlToTextError::NoFileSelected)
    }

    fn print_choices(&self, files: &[XmlFile]) -> Result<()> {
        self.term.write_line(&format!(
            "XML files in {}:",
            style(self.directory.display()).bold()
        ))?;

        if files.is_empty() {
            self.term.write_line("  (none)")?;
        }

        for (index, file) in files.iter().enumerate() {
            let name = file
                .path
                .strip_prefix(&self.directory)
                .unwrap_or(&file.path)
                .display()
                .to_string();
            self.term.write_line(&format!(
                "  {:>3}) {} {}",
                index + 1,
                name,
                style(format!("({})", file.format_size())).dim()
            ))?;
        }

        Ok(())
    }
}

/// Maps a picker answer to a path.
///
/// A number selects from `files` (1-based); anything else non-empty is a
/// path, relative paths resolving against `directory`.
pub fn resolve_choice(files: &[XmlFile], answer: &str, directory: &Path) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| files.get(index))
            .map(|file| file.path.clone());
    }

    Some(directory.join(answer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<XmlFile> {
        vec![
            XmlFile::new(PathBuf::from("/data/a.xml"), 10),
            XmlFile::new(PathBuf::from("/data/b.xml"), 20),
        ]
    }

    #[test]
    fn test_resolve_by_number() {
        let dir = Path::new("/data");
        assert_eq!(resolve_choice(&files(), "1", dir), Some(PathBuf::from("/data/a.xml")));
        assert_eq!(resolve_choice(&files(), " 2\n", dir), Some(PathBuf::from("/data/b.xml")));
    }

    #[test]
    fn test_out_of_range_number_cancels() {
        let dir = Path::new("/data");
        assert_eq!(resolve_choice(&files(), "0", dir), None);
        assert_eq!(resolve_choice(&files(), "3", dir), None);
    }

    #[test]
    fn test_empty_answer_cancels() {
        assert_eq!(resolve_choice(&files(), "", Path::new("/data")), None);
        assert_eq!(resolve_choice(&files(), "   ", Path::new("/data")), None);
    }

    #[test]
    fn test_path_answers() {
        let dir = Path::new("/data");
        assert_eq!(
            resolve_choice(&files(), "sub/c.xml", dir),
            Some(PathBuf::from("/data/sub/c.xml"))
        );
        assert_eq!(
            resolve_choice(&[], "/elsewhere/d.xml", dir),
            Some(PathBuf::from("/elsewhere/d.xml"))
        );
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlToTextError {
    #[error("File not found: {path}")]
    InputNotFound { path: String },

    #[error("Can not read file: {path}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No file selected")]
    NoFileSelected,

    #[error("XML parsing failed in {path} at byte {position}: {message}")]
    Parse {
        path: String,
        position: u64,
        message: String,
    },

    #[error("Invalid text encoding in {path}: {message}")]
    Encoding { path: String, message: String },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl XmlToTextError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            XmlToTextError::InputNotFound { .. } | XmlToTextError::InputUnreadable { .. } => 2,
            XmlToTextError::NoFileSelected => 3,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for XmlToTextError {
    fn user_message(&self) -> String {
        match self {
            XmlToTextError::InputUnreadable { path, source } => {
                format!("Can not read file: {} ({})", path, source)
            }
            XmlToTextError::OutputWrite { path, source } => {
                format!("Failed to write output file {}: {}", path, source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            XmlToTextError::InputNotFound { .. } => Some(
                "Check the path, or run without arguments to pick a file interactively.".to_string()
            ),
            XmlToTextError::InputUnreadable { .. } => Some(
                "Ensure the path points to a regular file and that you have read permission.".to_string()
            ),
            XmlToTextError::Parse { .. } => Some(
                "The document is not well-formed XML. Fix the reported position and try again.".to_string()
            ),
            XmlToTextError::Encoding { .. } => Some(
                "Save the file as UTF-8, or declare its encoding in the XML declaration.".to_string()
            ),
            XmlToTextError::OutputWrite { .. } => Some(
                "Ensure you have write permission for the directory of the source file.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for XmlToTextError {
    fn from(error: toml::de::Error) -> Self {
        XmlToTextError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XmlToTextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = XmlToTextError::InputNotFound {
            path: "missing.xml".to_string(),
        };
        assert_eq!(not_found.exit_code(), 2);

        let unreadable = XmlToTextError::InputUnreadable {
            path: "locked.xml".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(unreadable.exit_code(), 2);

        assert_eq!(XmlToTextError::NoFileSelected.exit_code(), 3);

        let parse = XmlToTextError::Parse {
            path: "bad.xml".to_string(),
            position: 12,
            message: "unexpected end".to_string(),
        };
        assert_eq!(parse.exit_code(), 1);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = XmlToTextError::InputNotFound {
            path: "missing.xml".to_string(),
        };
        assert!(error.user_message().contains("File not found"));
        assert!(error.suggestion().is_some());

        assert!(XmlToTextError::NoFileSelected.suggestion().is_none());
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = XmlToTextError::from(toml_error);
        assert!(matches!(error, XmlToTextError::Config { .. }));
    }
}

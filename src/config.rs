use crate::error::{Result, XmlToTextError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one conversion run.
///
/// These are developer settings: the command line always runs with
/// [`Config::default`], library callers may build or load their own.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Parse the input as XML. When false the file is copied line by line.
    pub parse_xml: bool,
    pub filter: FilterConfig,
}

/// Emits an element's line only when one of its attribute values contains
/// one of the search values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    pub search_values: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse_xml: true,
            filter: FilterConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            search_values: vec!["test".to_string()],
        }
    }
}

impl FilterConfig {
    pub fn with_search_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            search_values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any value contains any search value as a literal substring.
    pub fn matches<S: AsRef<str>>(&self, values: &[S]) -> bool {
        values.iter().any(|value| {
            self.search_values
                .iter()
                .any(|search| value.as_ref().contains(search.as_str()))
        })
    }

    /// True if a line built from `values` should be emitted.
    pub fn admits<S: AsRef<str>>(&self, values: &[S]) -> bool {
        !self.enabled || self.matches(values)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse_xml(mut self, parse_xml: bool) -> Self {
        self.parse_xml = parse_xml;
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(XmlToTextError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| XmlToTextError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| XmlToTextError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| XmlToTextError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| XmlToTextError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // An enabled filter without terms would drop every line
        if self.filter.enabled && self.filter.search_values.iter().all(|s| s.is_empty()) {
            return Err(XmlToTextError::Config {
                message: "Filtering is enabled but no search values are configured".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{Config, FilterConfig};
pub use error::{Result, UserFriendlyError, XmlToTextError};
pub use report::ConversionReport;

// Core functionality re-exports
pub use extractor::{
    build_line, collapse_line_breaks, extract, ElementEvent, ElementEvents, ExtractionCallback,
    Extractor, OutputManager, ResultAccumulator, WrittenOutput, LINE_SEPARATOR,
};
pub use scanner::{FileFilter, XmlFile, XmlScanner};
pub use ui::{FilePicker, OutputFormatter, OutputMode, ProgressManager};

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main library interface: one conversion per call.
pub struct XmlToText {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl XmlToText {
    pub fn new(config: Config, output_formatter: OutputFormatter, progress_manager: ProgressManager) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
        })
    }

    /// Instance for command-line runs: default configuration.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let output_formatter =
            OutputFormatter::new(cli_args.output_mode(), cli_args.verbosity_level(), cli_args.quiet);
        let progress_manager = ProgressManager::new(cli_args.show_progress());

        Self::new(Config::default(), output_formatter, progress_manager)
    }

    /// Converts `input` into a sibling text file.
    ///
    /// Nothing is written unless extraction succeeds completely.
    pub fn convert<P: AsRef<Path>>(&self, input: P) -> Result<ConversionReport> {
        let start_time = Instant::now();
        let input_path = absolute_path(input.as_ref())?;

        self.output_formatter
            .start_operation(&format!("Extracting attribute values from {}", input_path.display()));
        self.output_formatter.debug(&format!(
            "Parse XML: {}, filtering: {} {:?}",
            self.config.parse_xml, self.config.filter.enabled, self.config.filter.search_values
        ));

        let accumulator = self.extract(&input_path)?;
        let elements_seen = accumulator.elements_seen();

        if !self.config.parse_xml {
            self.output_formatter.info("Raw mode: copying lines without parsing");
        }

        let spinner = self.progress_manager.create_spinner("Writing output");
        let output_manager = OutputManager::new(&input_path);
        let written = output_manager.write(&accumulator.into_text());
        spinner.finish_and_clear();
        let WrittenOutput {
            path: output_path,
            lines: lines_written,
        } = written?;

        self.output_formatter
            .success(&format!("Wrote {} lines to {}", lines_written, output_path.display()));

        Ok(ConversionReport {
            input_path,
            output_path,
            parse_xml: self.config.parse_xml,
            filtering: self.config.filter.enabled,
            elements_seen,
            lines_written,
            duration: start_time.elapsed(),
            converted_at: Utc::now(),
        })
    }

    /// Runs the parser driver with a progress spinner.
    pub fn extract(&self, input_path: &Path) -> Result<ResultAccumulator> {
        let source = input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input_path.display().to_string());

        let spinner = self.progress_manager.create_element_spinner(&source);
        let progress_callback = {
            let pb = spinner.clone();
            move |elements_seen: usize| {
                ui::progress::update_element_progress(&pb, elements_seen);
            }
        };

        let started = Instant::now();
        let result = Extractor::new(&self.config).extract_file(input_path, Some(&progress_callback));

        match &result {
            Ok(accumulator) => {
                ui::progress::finish_progress_with_summary(
                    &spinner,
                    &format!("Parsed {}", source),
                    started.elapsed(),
                );
                self.output_formatter.debug(&format!(
                    "{} element events, {} lines kept",
                    accumulator.elements_seen(),
                    accumulator.len()
                ));
            }
            Err(_) => spinner.abandon(),
        }

        result
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &XmlToTextError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Converts `input` with `config` and no terminal output.
pub fn convert_file<P: AsRef<Path>>(input: P, config: Config) -> Result<ConversionReport> {
    let xml_to_text = XmlToText::new(
        config,
        OutputFormatter::new(OutputMode::Plain, 0, true),
        ProgressManager::new(false),
    )?;
    xml_to_text.convert(input)
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

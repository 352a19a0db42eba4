use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xmltotext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract XML attribute values into a comma-separated text file")]
#[command(
    long_about = "Parses a XML file, extracts values of XML attributes,\n\
                  and writes CSV (comma-separated values) to a new text file.\n\
                  The text file is created in the directory of the source file."
)]
#[command(after_help = "EXAMPLES:\n  \
    xmltotext                 Shows a file picker and parses the selected file.\n  \
    xmltotext data.xml        Parses data.xml into data.xml.txt.\n  \
    xmltotext -v data.xml     Also prints element and line counts.\n\n\
    Website: https://github.com/adibaba/XmlToText")]
pub struct Cli {
    /// XML file to convert (omit to pick one interactively)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format for messages and the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        self.output_format.into()
    }

    /// Progress spinners only make sense for interactive human output.
    pub fn show_progress(&self) -> bool {
        !self.quiet
            && self.output_format == OutputFormat::Human
            && console::Term::stderr().is_term()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

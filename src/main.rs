use clap::Parser;
use std::path::PathBuf;
use std::process;
use xmltotext::{Cli, FilePicker, OutputFormatter, OutputMode, Result, XmlToText, XmlToTextError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Help and version requests exit here with status 0
    let cli = Cli::parse();

    let xml_to_text = match XmlToText::from_cli(&cli) {
        Ok(xml_to_text) => xml_to_text,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    let input = match resolve_input(&cli) {
        Ok(input) => input,
        Err(e) => {
            xml_to_text.handle_error(&e);
            return e.exit_code();
        }
    };

    match xml_to_text.convert(&input) {
        Ok(report) => {
            xml_to_text.output_formatter().print_conversion_report(&report);
            0
        }
        Err(e) => {
            xml_to_text.handle_error(&e);
            e.exit_code()
        }
    }
}

fn resolve_input(cli: &Cli) -> Result<PathBuf> {
    match cli.file {
        Some(ref file) => Ok(file.clone()),
        None => FilePicker::new(std::env::current_dir()?).pick(),
    }
}

fn print_startup_error(error: &XmlToTextError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

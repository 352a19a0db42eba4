pub mod file_filter;
pub mod xml_scanner;

pub use file_filter::FileFilter;
pub use xml_scanner::{XmlFile, XmlScanner};

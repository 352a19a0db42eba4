pub mod output;
pub mod picker;
pub mod progress;

pub use output::{OutputFormatter, OutputMode};
pub use picker::FilePicker;
pub use progress::ProgressManager;

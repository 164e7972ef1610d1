pub mod progress;
pub mod report;

pub use progress::{OperationStatus, ProgressSpinner, display_status};
pub use report::{OutputFormat, ReportDisplay};

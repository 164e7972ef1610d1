pub mod error_helpers;
pub mod logging;
pub mod retry;
pub mod validation;

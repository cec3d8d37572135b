pub mod command_helpers;
pub mod logging;
pub mod response;

pub use command_helpers::execute_logged;
pub use response::{ApiFailure, ApiSuccess};

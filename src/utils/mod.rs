// Shared utilities module
pub mod errors;
pub mod logging;
pub mod ui;
pub mod build_expressions;
pub mod config_loader;

pub use errors::*;
pub use logging::*;
pub use ui::*;
pub use build_expressions::*;
pub use config_loader::*;

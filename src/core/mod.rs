// Core domain layer
pub mod models;
pub mod interfaces;
pub mod context;
pub mod conditionals;
pub mod regions;
pub mod naming;
pub mod globals;
pub mod core_bundle;
pub mod loader;
pub mod registry;
pub mod es5_disabled;
pub mod services;

pub use models::*;
pub use interfaces::*;
pub use context::*;
pub use conditionals::*;
pub use services::*;

// Infrastructure layer
pub mod file_system;
pub mod processors;
pub mod static_assets;
pub mod bundler;

pub use file_system::*;
pub use processors::*;
pub use static_assets::*;
pub use bundler::*;

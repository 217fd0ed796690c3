// Processors module
pub mod minifier;
pub mod hasher;

pub use minifier::*;
pub use hasher::*;

// appbundle - app file generation for component libraries
// Core composition, global assembly, loader and registry output

pub mod utils;
pub mod core;
pub mod infrastructure;
pub mod cli;

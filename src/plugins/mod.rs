pub mod level_loader;
pub mod navigation;

pub use level_loader::*;
pub use navigation::*;

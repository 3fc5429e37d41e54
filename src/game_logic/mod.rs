pub mod debug;
pub mod errors;
pub mod movement;
pub mod navigation;
pub mod stuck;

pub use debug::*;
pub use movement::*;
pub use navigation::*;
pub use stuck::*;

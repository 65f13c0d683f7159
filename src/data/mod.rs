pub mod dimensions;
pub mod loader;

pub use dimensions::*;
pub use loader::*;

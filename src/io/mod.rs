pub mod input;

pub use input::*;

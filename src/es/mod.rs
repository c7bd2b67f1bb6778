pub mod elastic;
pub mod kibana;

pub use elastic::*;
pub use kibana::*;

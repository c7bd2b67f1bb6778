pub mod document;
pub mod episode;
pub mod index;

pub use document::*;
pub use episode::*;
pub use index::*;

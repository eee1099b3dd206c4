pub mod conversion;
pub mod tree;

pub use conversion::*;
pub use tree::*;

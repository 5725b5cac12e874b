pub mod error;
pub mod shortener;

pub use error::*;
pub use shortener::*;

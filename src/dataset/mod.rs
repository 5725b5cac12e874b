//! Dataset partitioning and the on-disk file shared by benchmark phases.

pub mod file;
pub mod partition;

pub use file::*;
pub use partition::*;

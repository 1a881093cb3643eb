//! Record storage backing the reports.

pub mod dataset;
pub mod memory;
pub mod sample;

pub use dataset::*;
pub use memory::*;
pub use sample::*;

//! Report aggregation engine.
//!
//! Bucket arithmetic, per-stream aggregation, the merge step and the
//! renderers for the resulting rows.

pub mod aggregator;
pub mod engine;
pub mod formatter;
pub mod periods;
pub mod source;

pub use aggregator::*;
pub use engine::*;
pub use formatter::*;
pub use source::*;

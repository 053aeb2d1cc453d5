//! Analysis modules.
//!
//! Normalization, frequency aggregation, coverage statistics, and the
//! dashboard that ties them together.

pub mod aggregator;
pub mod coverage;
pub mod dashboard;
pub mod normalizer;

pub use dashboard::*;
pub use normalizer::*;

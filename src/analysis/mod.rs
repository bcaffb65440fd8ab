//! Analysis modules.
//!
//! This module holds the department aggregation used by the users summary.

pub mod aggregator;

pub use aggregator::*;

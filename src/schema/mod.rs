//! formfix.metric.v1 wire schema
//!
//! This module defines the JSON shape capture clients post to the collector
//! and the batch formats accepted for offline analysis.

mod adapter;
mod payload;

pub use adapter::*;
pub use payload::*;

//! Output stages for the assembled record.
//!
//! - [`json`]: serializes a `ConditionsRecord`
//! - [`cache`]: writes it to Redis under the well-known key

pub mod cache;
pub mod json;

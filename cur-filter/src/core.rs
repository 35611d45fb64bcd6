//! Core module for removing records from a sequence pool
//!
//! Two filters live here: a length filter that drops outliers above a
//! percentile of the current length distribution, and a negative
//! filter that removes candidates already present in the positive pool.

pub mod length;
pub mod negative;

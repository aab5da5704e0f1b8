//! Benchmark support crate for peakclus.
//!
//! Generates smooth synthetic statistic fields on square lattices so the
//! Criterion benchmarks can time extraction at several sizes and variate
//! counts.

pub mod error;
pub mod field;
pub mod params;

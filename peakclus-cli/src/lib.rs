//! Support library for the `peakclus` binary.
//!
//! Exposes the CLI and logging modules so doctests and unit tests can drive the
//! command pipeline in-process.

pub mod cli;
pub mod logging;

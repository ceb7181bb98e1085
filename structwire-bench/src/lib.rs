//! # structwire bench
//!
//! Benchmark fixtures for structwire performance testing.

pub mod fixtures;

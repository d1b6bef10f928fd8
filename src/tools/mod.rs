//! The tools module provides the helper pieces around the codec.
//!
//! The tools are:
//! - cli: Command line interface.
//! - freq_count: Symbol frequency count.
//! - output: Output file naming and creation.
//!
pub mod cli;
pub mod freq_count;
pub mod output;

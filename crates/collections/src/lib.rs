//! Various collections implemented for the autom toolset.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod vecset;

pub use vecset::*;

//! Utility types and functions related to IO for the autom toolset.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod line_iterator;
mod progress;

pub use line_iterator::*;
pub use progress::*;

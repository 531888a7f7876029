//! Command line functionality that is shared between the autom tools.
#![forbid(unsafe_code)]

mod verbosity;
mod version;

pub use verbosity::*;
pub use version::*;

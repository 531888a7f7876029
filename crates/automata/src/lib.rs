//!
//! A crate containing finite automata, possibly nondeterministic and with
//! epsilon transitions, together with the subset construction that makes them
//! deterministic and the procedure that decides whether words are accepted.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod automaton;
mod builder;
mod compare;
mod epsilon_closure;
mod evaluate;
mod io_fa;
mod random_automaton;
mod simulate;
mod subset_construction;

pub use automaton::*;
pub use builder::*;
pub use compare::*;
pub use epsilon_closure::*;
pub use evaluate::*;
pub use io_fa::*;
pub use random_automaton::*;
pub use simulate::*;
pub use subset_construction::*;

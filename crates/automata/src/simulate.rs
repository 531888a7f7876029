use autom_collections::VecSet;

use crate::Automaton;
use crate::Label;
use crate::StateIndex;
use crate::Verdict;
use crate::epsilon_closure;
use crate::epsilon_closure_set;
use crate::evaluate::word_label;

/// Runs the word directly on a (possibly nondeterministic) automaton by
/// keeping track of the set of reachable states, with the same
/// classification as [`crate::evaluate`] on the result of the subset
/// construction.
pub fn simulate(nfa: &Automaton, word: &str) -> Verdict {
    let mut current: VecSet<StateIndex> = epsilon_closure(nfa, nfa.initial_state_index());

    for character in word.chars() {
        let label = match word_label(nfa, character) {
            Some(Label::Symbol(symbol)) => Label::Symbol(symbol),
            // Epsilon transitions cannot be taken by reading a character.
            Some(Label::Epsilon) => return Verdict::Reject,
            None => return Verdict::InvalidSymbol,
        };

        let reached: Vec<StateIndex> = current
            .iter()
            .filter_map(|&state| nfa.transitions(state, label))
            .flat_map(|destinations| destinations.iter().copied())
            .collect();

        if reached.is_empty() {
            return Verdict::Reject;
        }

        current = epsilon_closure_set(nfa, reached);
    }

    if current.is_disjoint(nfa.accepting_states()) {
        Verdict::Reject
    } else {
        Verdict::Accept
    }
}

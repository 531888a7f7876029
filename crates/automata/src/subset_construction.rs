//! Subset construction for converting an automaton with epsilon transitions
//! into an equivalent deterministic automaton.

use std::collections::VecDeque;

use log::debug;
use log::info;
use rustc_hash::FxHashMap;

use autom_collections::VecSet;
use autom_io::TimeProgress;

use crate::Automaton;
use crate::Label;
use crate::StateIndex;
use crate::automaton::TransitionMap;
use crate::epsilon_closure;
use crate::epsilon_closure_set;

/// Keeps track of the subsets discovered so far, the position of a subset is
/// the index of the deterministic state it represents.
struct SubsetTable {
    subsets: Vec<VecSet<StateIndex>>,
    indices: FxHashMap<VecSet<StateIndex>, StateIndex>,
}

impl SubsetTable {
    fn new() -> Self {
        Self {
            subsets: Vec::new(),
            indices: FxHashMap::default(),
        }
    }

    /// Returns the deterministic state for the given subset, and whether it was newly discovered.
    fn insert(&mut self, subset: VecSet<StateIndex>) -> (StateIndex, bool) {
        if let Some(&index) = self.indices.get(&subset) {
            return (index, false);
        }

        let index = StateIndex::new(self.subsets.len());
        self.indices.insert(subset.clone(), index);
        self.subsets.push(subset);
        (index, true)
    }

    fn subset(&self, index: StateIndex) -> &VecSet<StateIndex> {
        &self.subsets[*index]
    }

    fn len(&self) -> usize {
        self.subsets.len()
    }
}

/// Convert the given automaton into a deterministic automaton with the same
/// language using the subset construction.
///
/// The states of the result are named `S0`, `S1`, ... in the order in which
/// they are discovered, where `S0` is the initial state. Symbols for which a
/// subset has no successor get no transition, so the dead state is implicit.
/// The input automaton is not changed.
pub fn subset_construction(nfa: &Automaton) -> Automaton {
    subset_construction_with_subsets(nfa).0
}

/// Same as [`subset_construction`], but also returns for every deterministic
/// state the set of states of `nfa` it represents.
pub fn subset_construction_with_subsets(nfa: &Automaton) -> (Automaton, Vec<VecSet<StateIndex>>) {
    info!(
        "Starting subset construction on {} states and {} transitions...",
        nfa.num_of_states(),
        nfa.num_of_transitions()
    );

    let mut table = SubsetTable::new();
    let mut frontier: VecDeque<StateIndex> = VecDeque::new();
    let mut transitions = TransitionMap::default();

    let (initial_state, _) = table.insert(epsilon_closure(nfa, nfa.initial_state_index()));
    frontier.push_back(initial_state);

    let mut progress = TimeProgress::new(
        |(discovered, remaining): (usize, usize)| {
            info!("Discovered {discovered} deterministic states, {remaining} left to explore...")
        },
        1,
    );

    while let Some(current) = frontier.pop_front() {
        // The table only grows, so the subset of the current state stays in place.
        let subset = table.subset(current).clone();
        debug!("S{current} = {subset:?}");

        for symbol in nfa.iter_symbols() {
            let label = Label::Symbol(symbol);
            let reached = subset
                .iter()
                .filter_map(|&state| nfa.transitions(state, label))
                .fold(VecSet::new(), |reached, destinations| reached.union(destinations));

            if reached.is_empty() {
                continue;
            }

            let (next, discovered) = table.insert(epsilon_closure_set(nfa, reached));
            if discovered {
                frontier.push_back(next);
            }

            transitions.insert((current, label), VecSet::singleton(next));
        }

        progress.print((table.len(), frontier.len()));
    }

    let accepting_states: VecSet<StateIndex> = table
        .subsets
        .iter()
        .enumerate()
        .filter(|(_, subset)| !subset.is_disjoint(nfa.accepting_states()))
        .map(|(index, _)| StateIndex::new(index))
        .collect();

    let names = (0..table.len()).map(|index| format!("S{index}")).collect();

    info!(
        "Finished subset construction with {} states and {} transitions",
        table.len(),
        transitions.len()
    );

    let dfa = Automaton::from_parts(
        nfa.alphabet().to_vec(),
        names,
        transitions,
        initial_state,
        accepting_states,
    );

    (dfa, table.subsets)
}

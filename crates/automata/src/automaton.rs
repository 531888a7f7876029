use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use autom_collections::VecSet;
use autom_utilities::TagIndex;

/// The reserved symbol that denotes an epsilon transition in descriptions.
pub const EPSILON_MARKER: &str = "&";

/// A unique type for the states.
pub struct StateTag;

/// A unique type for the alphabet symbols.
pub struct SymbolTag;

/// The index for a state.
pub type StateIndex = TagIndex<usize, StateTag>;

/// The index of a symbol in the alphabet.
pub type SymbolIndex = TagIndex<usize, SymbolTag>;

/// The label of a transition, either an alphabet symbol or epsilon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Epsilon,
    Symbol(SymbolIndex),
}

/// The transition relation, every present entry has a non-empty set of destinations.
pub(crate) type TransitionMap = FxHashMap<(StateIndex, Label), VecSet<StateIndex>>;

/// A finite automaton consisting of an alphabet, a set of named states, a
/// transition relation, an initial state and a set of accepting states.
///
/// The automaton is nondeterministic in general, a transition maps an origin
/// and a label to a set of destinations. It is deterministic when it has no
/// epsilon transitions and every set of destinations is a singleton, see
/// [`Automaton::is_deterministic`]. An automaton can only be obtained through
/// the [`crate::AutomatonBuilder`], the description reader or the subset
/// construction, and is immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    /// The sorted alphabet, indexed by [`SymbolIndex`].
    alphabet: Vec<String>,

    /// The names of the states, indexed by [`StateIndex`].
    states: Vec<String>,
    state_lookup: FxHashMap<String, StateIndex>,

    transitions: TransitionMap,

    initial_state: StateIndex,
    accepting_states: VecSet<StateIndex>,
}

impl Automaton {
    /// Constructs an automaton from parts that satisfy the invariants: the
    /// alphabet is sorted without duplicates, state names are unique, and all
    /// referenced indices are in range.
    pub(crate) fn from_parts(
        alphabet: Vec<String>,
        states: Vec<String>,
        transitions: TransitionMap,
        initial_state: StateIndex,
        accepting_states: VecSet<StateIndex>,
    ) -> Automaton {
        debug_assert!(alphabet.windows(2).all(|pair| pair[0] < pair[1]));
        debug_assert!(*initial_state < states.len());
        debug_assert!(accepting_states.iter().all(|state| **state < states.len()));
        debug_assert!(
            transitions
                .values()
                .all(|destinations| !destinations.is_empty() && destinations.iter().all(|to| **to < states.len()))
        );

        let state_lookup = states
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), StateIndex::new(index)))
            .collect();

        Automaton {
            alphabet,
            states,
            state_lookup,
            transitions,
            initial_state,
            accepting_states,
        }
    }

    /// Returns the index of the initial state.
    pub fn initial_state_index(&self) -> StateIndex {
        self.initial_state
    }

    /// Returns the set of accepting states.
    pub fn accepting_states(&self) -> &VecSet<StateIndex> {
        &self.accepting_states
    }

    /// Returns true iff the given state is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting_states.contains(&state)
    }

    /// Returns the destinations of the transition from `state` with the given
    /// label, or `None` when there is no such transition.
    pub fn transitions(&self, state: StateIndex, label: Label) -> Option<&VecSet<StateIndex>> {
        self.transitions.get(&(state, label))
    }

    /// Returns the destination of the transition from `state` on `symbol` in a
    /// deterministic automaton.
    pub fn successor(&self, state: StateIndex, symbol: SymbolIndex) -> Option<StateIndex> {
        self.transitions(state, Label::Symbol(symbol)).and_then(|destinations| {
            debug_assert_eq!(destinations.len(), 1, "The automaton should be deterministic");
            destinations.first().copied()
        })
    }

    /// Returns the sorted alphabet.
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Returns the index of the given symbol in the alphabet.
    pub fn symbol_index(&self, symbol: &str) -> Option<SymbolIndex> {
        self.alphabet
            .binary_search_by(|other| other.as_str().cmp(symbol))
            .ok()
            .map(SymbolIndex::new)
    }

    /// Returns the symbol with the given index.
    pub fn symbol(&self, symbol: SymbolIndex) -> &str {
        &self.alphabet[*symbol]
    }

    /// Returns the textual representation of the label, the epsilon marker for epsilon.
    pub fn label_name(&self, label: Label) -> &str {
        match label {
            Label::Epsilon => EPSILON_MARKER,
            Label::Symbol(symbol) => self.symbol(symbol),
        }
    }

    /// Iterates over the labels of the alphabet symbols, epsilon excluded.
    pub fn iter_symbols(&self) -> impl Iterator<Item = SymbolIndex> + use<> {
        (0..self.num_of_symbols()).map(SymbolIndex::new)
    }

    /// Returns the index of the state with the given name.
    pub fn state_index(&self, name: &str) -> Option<StateIndex> {
        self.state_lookup.get(name).copied()
    }

    /// Returns the name of the given state.
    pub fn state_name(&self, state: StateIndex) -> &str {
        &self.states[*state]
    }

    /// Iterate over all state indices of the automaton.
    pub fn iter_states(&self) -> impl Iterator<Item = StateIndex> + use<> {
        (0..self.num_of_states()).map(StateIndex::new)
    }

    /// Iterates over all transitions as (from, label, to) triples, ordered by origin and label.
    pub fn iter_transitions(&self) -> impl Iterator<Item = (StateIndex, Label, StateIndex)> + '_ {
        self.transitions
            .iter()
            .sorted_unstable_by_key(|(key, _)| **key)
            .flat_map(|(&(from, label), destinations)| destinations.iter().map(move |&to| (from, label, to)))
    }

    /// Returns the number of states.
    pub fn num_of_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of alphabet symbols.
    pub fn num_of_symbols(&self) -> usize {
        self.alphabet.len()
    }

    /// Returns the number of transitions, counting every destination separately.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions.values().map(VecSet::len).sum()
    }

    /// Returns true iff the automaton has at least one epsilon transition.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.keys().any(|(_, label)| *label == Label::Epsilon)
    }

    /// Returns true iff there are no epsilon transitions and every transition
    /// has a single destination.
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .iter()
            .all(|((_, label), destinations)| *label != Label::Epsilon && destinations.len() == 1)
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of symbols: {}", self.num_of_symbols())?;
        writeln!(f, "Number of states: {}", self.num_of_states())?;
        writeln!(f, "Number of accepting states: {}", self.accepting_states.len())?;
        writeln!(f, "Number of transitions: {}", self.num_of_transitions())?;
        write!(f, "Deterministic: {}", self.is_deterministic())
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        writeln!(f, "Alphabet: {{{}}}", self.alphabet.iter().format(", "))?;
        writeln!(f, "Initial state: {}", self.state_name(self.initial_state))?;
        writeln!(
            f,
            "Accepting states: {{{}}}",
            self.accepting_states.iter().map(|state| self.state_name(*state)).format(", ")
        )?;

        for (from, label, to) in self.iter_transitions() {
            writeln!(
                f,
                "{} --[{}]-> {}",
                self.state_name(from),
                self.label_name(label),
                self.state_name(to)
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use autom_collections::vecset;

    use super::*;

    fn example() -> Automaton {
        let alphabet = vec!["a".to_string(), "b".to_string()];
        let states = vec!["q0".to_string(), "q1".to_string()];

        let a = Label::Symbol(SymbolIndex::new(0));
        let mut transitions = TransitionMap::default();
        transitions.insert(
            (StateIndex::new(0), a),
            vecset![StateIndex::new(0), StateIndex::new(1)],
        );
        transitions.insert((StateIndex::new(1), Label::Epsilon), vecset![StateIndex::new(0)]);

        Automaton::from_parts(
            alphabet,
            states,
            transitions,
            StateIndex::new(0),
            vecset![StateIndex::new(1)],
        )
    }

    #[test]
    fn test_automaton_queries() {
        let automaton = example();

        assert_eq!(automaton.num_of_states(), 2);
        assert_eq!(automaton.num_of_transitions(), 3);
        assert_eq!(automaton.state_index("q1"), Some(StateIndex::new(1)));
        assert_eq!(automaton.state_index("q2"), None);
        assert_eq!(automaton.symbol_index("b"), Some(SymbolIndex::new(1)));
        assert_eq!(automaton.symbol_index("&"), None);
        assert!(automaton.is_accepting(StateIndex::new(1)));
        assert!(!automaton.is_accepting(StateIndex::new(0)));

        let a = Label::Symbol(SymbolIndex::new(0));
        let b = Label::Symbol(SymbolIndex::new(1));
        assert_eq!(automaton.transitions(StateIndex::new(0), a).map(VecSet::len), Some(2));
        assert!(automaton.transitions(StateIndex::new(0), b).is_none());
        assert!(automaton.transitions(StateIndex::new(1), a).is_none());
    }

    #[test]
    fn test_automaton_flavor() {
        let automaton = example();

        assert!(automaton.has_epsilon_transitions());
        assert!(!automaton.is_deterministic());
    }

    #[test]
    fn test_iter_transitions_sorted() {
        let automaton = example();

        let transitions: Vec<_> = automaton.iter_transitions().collect();
        assert_eq!(
            transitions,
            vec![
                (StateIndex::new(0), Label::Symbol(SymbolIndex::new(0)), StateIndex::new(0)),
                (StateIndex::new(0), Label::Symbol(SymbolIndex::new(0)), StateIndex::new(1)),
                (StateIndex::new(1), Label::Epsilon, StateIndex::new(0)),
            ]
        );
    }
}

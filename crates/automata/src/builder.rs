use std::fmt;

use log::debug;
use log::warn;
use rustc_hash::FxHashMap;
use thiserror::Error;

use autom_collections::VecSet;

use crate::Automaton;
use crate::EPSILON_MARKER;
use crate::Label;
use crate::StateIndex;
use crate::SymbolIndex;
use crate::automaton::TransitionMap;

/// The line of the description on which a rule was given, if it was read from one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location(pub Option<usize>);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, " on line {line}"),
            None => Ok(()),
        }
    }
}

/// The reasons why a description does not form a valid automaton.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedError {
    #[error("Incomplete automaton description, expected at least 5 lines but found {0}")]
    Incomplete(usize),

    #[error("The epsilon marker & cannot be declared as an alphabet symbol")]
    EpsilonInAlphabet,

    #[error("No initial state was given")]
    MissingInitialState,

    #[error("The initial state should be a single state name, found {0:?}")]
    InvalidInitialState(String),

    #[error("Initial state {0} is not in the set of states")]
    UnknownInitialState(String),

    #[error("Accepting state {0} is not in the set of states")]
    UnknownAcceptingState(String),

    #[error("Invalid transition rule{location}, expected <origin> <symbol> <destination> but found {text:?}")]
    InvalidRule { location: Location, text: String },

    #[error("Transition rule{location} refers to unknown state {state}")]
    UnknownState { location: Location, state: String },

    #[error("Transition rule{location} uses unknown symbol {symbol}")]
    UnknownSymbol { location: Location, symbol: String },

    #[error("The description is not valid UTF-8{location}")]
    InvalidEncoding { location: Location },
}

/// A transition rule by name, as it was added to the builder.
struct Rule {
    origin: String,
    symbol: String,
    destination: String,
    location: Location,
}

/// Collects the parts of an automaton by name and validates them once in
/// [`AutomatonBuilder::finish`], which either yields a complete automaton or
/// the first violation found.
///
/// Symbols and states are sets, adding one twice has no effect. States keep
/// the order in which they are first added, which determines their indices.
#[derive(Default)]
pub struct AutomatonBuilder {
    alphabet: Vec<String>,
    states: Vec<String>,
    accepting_states: Vec<String>,
    initial_state: Option<String>,
    rules: Vec<Rule>,
}

impl AutomatonBuilder {
    /// Initializes a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol to the alphabet.
    pub fn add_symbol(&mut self, symbol: &str) -> &mut Self {
        self.alphabet.push(symbol.to_string());
        self
    }

    /// Declares a state.
    pub fn add_state(&mut self, name: &str) -> &mut Self {
        self.states.push(name.to_string());
        self
    }

    /// Marks a state as accepting, it must also be declared with [`AutomatonBuilder::add_state`].
    pub fn add_accepting_state(&mut self, name: &str) -> &mut Self {
        self.accepting_states.push(name.to_string());
        self
    }

    /// Sets the initial state, it must also be declared with [`AutomatonBuilder::add_state`].
    pub fn set_initial_state(&mut self, name: &str) -> &mut Self {
        self.initial_state = Some(name.to_string());
        self
    }

    /// Adds the rule `origin symbol destination`, where the symbol is either
    /// in the alphabet or the [`EPSILON_MARKER`].
    pub fn add_rule(&mut self, origin: &str, symbol: &str, destination: &str) -> &mut Self {
        self.add_rule_at(Location::default(), origin, symbol, destination)
    }

    /// Same as [`AutomatonBuilder::add_rule`], but remembers where the rule
    /// was given for error reporting.
    pub fn add_rule_at(&mut self, location: Location, origin: &str, symbol: &str, destination: &str) -> &mut Self {
        self.rules.push(Rule {
            origin: origin.to_string(),
            symbol: symbol.to_string(),
            destination: destination.to_string(),
            location,
        });
        self
    }

    /// Returns the number of rules added so far.
    pub fn num_of_rules(&self) -> usize {
        self.rules.len()
    }

    /// Validates the collected parts and constructs the automaton.
    pub fn finish(&self) -> Result<Automaton, MalformedError> {
        let mut alphabet = self.alphabet.clone();
        alphabet.sort_unstable();
        alphabet.dedup();

        if alphabet.iter().any(|symbol| symbol == EPSILON_MARKER) {
            return Err(MalformedError::EpsilonInAlphabet);
        }

        for symbol in alphabet.iter().filter(|symbol| symbol.chars().count() != 1) {
            warn!("Symbol {symbol:?} is not a single character, words can never contain it");
        }

        // Remove duplicated states, keeping the first occurrence.
        let mut states: Vec<String> = Vec::with_capacity(self.states.len());
        let mut state_lookup: FxHashMap<&str, StateIndex> = FxHashMap::default();
        for name in &self.states {
            if !state_lookup.contains_key(name.as_str()) {
                state_lookup.insert(name.as_str(), StateIndex::new(states.len()));
                states.push(name.clone());
            }
        }

        let initial_name = self.initial_state.as_ref().ok_or(MalformedError::MissingInitialState)?;
        let initial_state = *state_lookup
            .get(initial_name.as_str())
            .ok_or_else(|| MalformedError::UnknownInitialState(initial_name.clone()))?;

        let accepting_states = self
            .accepting_states
            .iter()
            .map(|name| {
                state_lookup
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| MalformedError::UnknownAcceptingState(name.clone()))
            })
            .collect::<Result<VecSet<StateIndex>, MalformedError>>()?;

        let lookup_state = |rule: &Rule, name: &String| {
            state_lookup
                .get(name.as_str())
                .copied()
                .ok_or_else(|| MalformedError::UnknownState {
                    location: rule.location,
                    state: name.clone(),
                })
        };

        let mut transitions = TransitionMap::default();
        for rule in &self.rules {
            let origin = lookup_state(rule, &rule.origin)?;
            let label = if rule.symbol == EPSILON_MARKER {
                Label::Epsilon
            } else {
                let index = alphabet
                    .binary_search(&rule.symbol)
                    .map_err(|_| MalformedError::UnknownSymbol {
                        location: rule.location,
                        symbol: rule.symbol.clone(),
                    })?;
                Label::Symbol(SymbolIndex::new(index))
            };
            let destination = lookup_state(rule, &rule.destination)?;

            transitions.entry((origin, label)).or_default().insert(destination);
        }

        debug!(
            "Constructed automaton with {} symbols, {} states and {} rules",
            alphabet.len(),
            states.len(),
            self.rules.len()
        );

        Ok(Automaton::from_parts(
            alphabet,
            states,
            transitions,
            initial_state,
            accepting_states,
        ))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn two_states() -> AutomatonBuilder {
        let mut builder = AutomatonBuilder::new();
        builder
            .add_symbol("a")
            .add_symbol("b")
            .add_state("q0")
            .add_state("q1")
            .add_accepting_state("q1")
            .set_initial_state("q0");
        builder
    }

    #[test]
    fn test_builder_accumulates_nondeterminism() {
        let mut builder = two_states();
        builder.add_rule("q0", "a", "q0").add_rule("q0", "a", "q1").add_rule("q0", "a", "q1");

        let automaton = builder.finish().unwrap();
        let a = Label::Symbol(automaton.symbol_index("a").unwrap());
        let destinations = automaton.transitions(automaton.initial_state_index(), a).unwrap();

        assert_eq!(destinations.len(), 2);
        assert_eq!(automaton.num_of_transitions(), 2);
    }

    #[test]
    fn test_builder_epsilon_rule() {
        let mut builder = two_states();
        builder.add_rule("q0", EPSILON_MARKER, "q1");

        let automaton = builder.finish().unwrap();
        assert!(automaton.has_epsilon_transitions());
        assert_eq!(automaton.num_of_symbols(), 2);
    }

    #[test]
    fn test_builder_duplicate_declarations() {
        let mut builder = two_states();
        builder.add_state("q0").add_symbol("a").add_accepting_state("q1");

        let automaton = builder.finish().unwrap();
        assert_eq!(automaton.num_of_states(), 2);
        assert_eq!(automaton.num_of_symbols(), 2);
        assert_eq!(automaton.accepting_states().len(), 1);
        assert_eq!(automaton.state_name(StateIndex::new(1)), "q1");
    }

    #[test]
    fn test_builder_unknown_initial_state() {
        let mut builder = two_states();
        builder.set_initial_state("q7");

        assert_eq!(
            builder.finish(),
            Err(MalformedError::UnknownInitialState("q7".to_string()))
        );
    }

    #[test]
    fn test_builder_missing_initial_state() {
        let mut builder = AutomatonBuilder::new();
        builder.add_state("q0");

        assert_eq!(builder.finish(), Err(MalformedError::MissingInitialState));
    }

    #[test]
    fn test_builder_unknown_accepting_state() {
        let mut builder = two_states();
        builder.add_accepting_state("q2");

        assert_eq!(
            builder.finish(),
            Err(MalformedError::UnknownAcceptingState("q2".to_string()))
        );
    }

    #[test]
    fn test_builder_epsilon_in_alphabet() {
        let mut builder = two_states();
        builder.add_symbol(EPSILON_MARKER);

        assert_eq!(builder.finish(), Err(MalformedError::EpsilonInAlphabet));
    }

    #[test]
    fn test_builder_invalid_rules() {
        let mut builder = two_states();
        builder.add_rule_at(Location(Some(6)), "q0", "c", "q1");
        assert_eq!(
            builder.finish(),
            Err(MalformedError::UnknownSymbol {
                location: Location(Some(6)),
                symbol: "c".to_string()
            })
        );

        let mut builder = two_states();
        builder.add_rule("q0", "a", "q3");
        let error = builder.finish().unwrap_err();
        assert_eq!(
            error,
            MalformedError::UnknownState {
                location: Location(None),
                state: "q3".to_string()
            }
        );
        assert_eq!(error.to_string(), "Transition rule refers to unknown state q3");
    }
}

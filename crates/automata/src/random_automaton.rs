use rand::Rng;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::EPSILON_MARKER;

/// Generates a random automaton with states `q0, q1, ...` and the symbols
/// `a, b, ...`, where `q0` is the initial state. Every state gets up to
/// `outdegree` outgoing transitions to random states, each of which is an
/// epsilon transition with the given probability, and every state is
/// accepting with probability one third.
pub fn random_automaton(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_symbols: usize,
    outdegree: usize,
    epsilon_probability: f64,
) -> Automaton {
    assert!(
        num_of_symbols > 0 && num_of_symbols <= 26,
        "Only between 1 and 26 alphabetic symbols are supported."
    );
    assert!(num_of_states > 0, "An automaton needs at least an initial state.");

    let symbols: Vec<String> = (0..num_of_symbols)
        .map(|i| char::from(b'a' + i as u8).to_string())
        .collect();
    let states: Vec<String> = (0..num_of_states).map(|i| format!("q{i}")).collect();

    let mut builder = AutomatonBuilder::new();
    for symbol in &symbols {
        builder.add_symbol(symbol);
    }

    for state in &states {
        builder.add_state(state);
        if rng.random_bool(1.0 / 3.0) {
            builder.add_accepting_state(state);
        }
    }
    builder.set_initial_state(&states[0]);

    for state in &states {
        for _ in 0..rng.random_range(0..=outdegree) {
            let to = &states[rng.random_range(0..num_of_states)];
            if rng.random_bool(epsilon_probability) {
                builder.add_rule(state, EPSILON_MARKER, to);
            } else {
                builder.add_rule(state, &symbols[rng.random_range(0..num_of_symbols)], to);
            }
        }
    }

    builder
        .finish()
        .expect("Random automata only refer to declared states and symbols")
}

use autom_collections::VecSet;

use crate::Automaton;
use crate::Label;
use crate::StateIndex;

/// Returns the set of states reachable from `state` using zero or more
/// epsilon transitions, which always includes `state` itself.
pub fn epsilon_closure(automaton: &Automaton, state: StateIndex) -> VecSet<StateIndex> {
    epsilon_closure_set(automaton, [state])
}

/// Returns the union of the epsilon closures of the given states, computed
/// with a single depth first search so every state is visited at most once.
pub fn epsilon_closure_set(automaton: &Automaton, states: impl IntoIterator<Item = StateIndex>) -> VecSet<StateIndex> {
    let mut visited = vec![false; automaton.num_of_states()];
    let mut closure = Vec::new();
    let mut stack: Vec<StateIndex> = Vec::new();

    for state in states {
        if !visited[*state] {
            visited[*state] = true;
            stack.push(state);
        }
    }

    while let Some(state) = stack.pop() {
        closure.push(state);

        if let Some(destinations) = automaton.transitions(state, Label::Epsilon) {
            for &to in destinations {
                if !visited[*to] {
                    visited[*to] = true;
                    stack.push(to);
                }
            }
        }
    }

    closure.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use autom_utilities::random_test;

    use crate::AutomatonBuilder;
    use crate::EPSILON_MARKER;
    use crate::random_automaton;

    use super::*;

    #[test]
    fn test_epsilon_closure_chain_and_cycle() {
        // q0 -&-> q1 -&-> q2 -&-> q1, q2 -a-> q3
        let mut builder = AutomatonBuilder::new();
        builder.add_symbol("a").set_initial_state("q0");
        for state in ["q0", "q1", "q2", "q3"] {
            builder.add_state(state);
        }
        builder
            .add_rule("q0", EPSILON_MARKER, "q1")
            .add_rule("q1", EPSILON_MARKER, "q2")
            .add_rule("q2", EPSILON_MARKER, "q1")
            .add_rule("q2", "a", "q3");
        let automaton = builder.finish().unwrap();

        let index = |name: &str| automaton.state_index(name).unwrap();

        let closure = epsilon_closure(&automaton, index("q0"));
        assert_eq!(
            closure.iter().map(|state| automaton.state_name(*state)).collect::<Vec<_>>(),
            vec!["q0", "q1", "q2"]
        );

        let closure = epsilon_closure(&automaton, index("q2"));
        assert_eq!(closure.len(), 2);
        assert!(!closure.contains(&index("q0")));

        let closure = epsilon_closure(&automaton, index("q3"));
        assert_eq!(closure, VecSet::singleton(index("q3")));
    }

    #[test]
    fn test_random_epsilon_closure_properties() {
        random_test(100, |rng| {
            let automaton = random_automaton(rng, 10, 2, 3, 0.4);

            for state in automaton.iter_states() {
                let closure = epsilon_closure(&automaton, state);
                assert!(closure.contains(&state), "The closure should contain its start state");

                for member in &closure {
                    let inner = epsilon_closure(&automaton, *member);
                    assert!(
                        inner.is_subset(&closure),
                        "The closure of a member {inner:?} should be contained in {closure:?}"
                    );
                }

                assert_eq!(epsilon_closure_set(&automaton, closure.iter().copied()), closure);
            }
        });
    }
}

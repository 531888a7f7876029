use std::collections::VecDeque;

use crate::Automaton;
use crate::StateIndex;

/// Returns true iff the reachable parts of the two deterministic automata are
/// equal up to the names of the states.
///
/// Both automata are traversed simultaneously from their initial states,
/// pairing the successors on every symbol. The pairing must be a bijection
/// that preserves acceptance and the presence of transitions.
pub fn is_isomorphic(left: &Automaton, right: &Automaton) -> bool {
    debug_assert!(left.is_deterministic() && right.is_deterministic());

    if left.alphabet() != right.alphabet() {
        return false;
    }

    let mut left_to_right: Vec<Option<StateIndex>> = vec![None; left.num_of_states()];
    let mut right_to_left: Vec<Option<StateIndex>> = vec![None; right.num_of_states()];
    let mut queue = VecDeque::new();

    left_to_right[*left.initial_state_index()] = Some(right.initial_state_index());
    right_to_left[*right.initial_state_index()] = Some(left.initial_state_index());
    queue.push_back((left.initial_state_index(), right.initial_state_index()));

    while let Some((state, other)) = queue.pop_front() {
        if left.is_accepting(state) != right.is_accepting(other) {
            return false;
        }

        // The alphabets are equal, so the symbol indices coincide.
        for symbol in left.iter_symbols() {
            match (left.successor(state, symbol), right.successor(other, symbol)) {
                (None, None) => {}
                (Some(next), Some(other_next)) => match (left_to_right[*next], right_to_left[*other_next]) {
                    (None, None) => {
                        left_to_right[*next] = Some(other_next);
                        right_to_left[*other_next] = Some(next);
                        queue.push_back((next, other_next));
                    }
                    (Some(mapped), Some(_)) if mapped == other_next => {}
                    _ => return false,
                },
                _ => return false,
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::read_automaton;
    use crate::subset_construction;

    use super::*;

    #[test]
    fn test_isomorphic_renaming() {
        let left = read_automaton("a b\nx y\ny\nx\nx a y\ny b x\n".as_bytes()).unwrap();
        let right = read_automaton("a b\np q\np\nq\nq a p\np b q\n".as_bytes()).unwrap();

        assert!(is_isomorphic(&left, &right));
        assert!(is_isomorphic(&subset_construction(&left), &right));
    }

    #[test]
    fn test_not_isomorphic() {
        let left = read_automaton("a b\nx y\ny\nx\nx a y\ny b x\n".as_bytes()).unwrap();
        let accepting = read_automaton("a b\nx y\nx y\nx\nx a y\ny b x\n".as_bytes()).unwrap();
        let extra = read_automaton("a b\nx y\ny\nx\nx a y\ny b x\ny a y\n".as_bytes()).unwrap();
        let other_alphabet = read_automaton("a c\nx y\ny\nx\nx a y\ny c x\n".as_bytes()).unwrap();

        assert!(!is_isomorphic(&left, &accepting));
        assert!(!is_isomorphic(&left, &extra));
        assert!(!is_isomorphic(&left, &other_alphabet));
    }
}

use std::collections::HashMap;
use std::fmt;

use log::debug;
use rayon::prelude::*;

use crate::Automaton;
use crate::EPSILON_MARKER;
use crate::Label;
use crate::subset_construction;

/// The classification of a word by an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The word is in the language.
    Accept,
    /// The word only consists of known symbols, but is not in the language.
    Reject,
    /// The word contains a symbol outside of the alphabet.
    InvalidSymbol,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "ACCEPT"),
            Verdict::Reject => write!(f, "REJECT"),
            Verdict::InvalidSymbol => write!(f, "INVALID_SYMBOL"),
        }
    }
}

/// Returns the label for the given character of a word, or `None` when the
/// character is neither in the alphabet nor the epsilon marker.
pub(crate) fn word_label(automaton: &Automaton, character: char) -> Option<Label> {
    let mut buffer = [0u8; 4];
    let symbol: &str = character.encode_utf8(&mut buffer);

    if symbol == EPSILON_MARKER {
        Some(Label::Epsilon)
    } else {
        automaton.symbol_index(symbol).map(Label::Symbol)
    }
}

fn debug_assert_deterministic(dfa: &Automaton) {
    debug_assert!(dfa.is_deterministic(), "Words can only be evaluated on a deterministic automaton");
}

/// Runs the word character by character on a deterministic automaton.
///
/// # Details
///
/// A character outside of the alphabet classifies the word as
/// [`Verdict::InvalidSymbol`] before the transitions are consulted. When
/// there is no transition for the current state and character the word is
/// rejected. The epsilon marker is never consumed by a deterministic
/// automaton, so a word containing it is rejected unless an invalid symbol
/// occurs before that point.
///
/// The automaton must be deterministic, which the batch functions such as
/// [`evaluate_words`] check once in debug builds.
pub fn evaluate(dfa: &Automaton, word: &str) -> Verdict {
    let mut current = dfa.initial_state_index();
    for character in word.chars() {
        let Some(label) = word_label(dfa, character) else {
            return Verdict::InvalidSymbol;
        };

        match dfa.transitions(current, label).and_then(|destinations| destinations.first()) {
            Some(&next) => current = next,
            None => return Verdict::Reject,
        }
    }

    if dfa.is_accepting(current) {
        Verdict::Accept
    } else {
        Verdict::Reject
    }
}

/// Evaluates every word on the same deterministic automaton and returns the
/// verdict per word.
///
/// Since the result is keyed by the word, a word that occurs multiple times
/// is stored once and later occurrences overwrite the earlier verdict (which
/// is the same). Use [`evaluate_words_ordered`] to keep every occurrence.
pub fn evaluate_words<I, S>(dfa: &Automaton, words: I) -> HashMap<String, Verdict>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    debug_assert_deterministic(dfa);

    let mut results = HashMap::new();
    for word in words {
        let word = word.as_ref();
        let verdict = evaluate(dfa, word);
        debug!("Word {word:?} is {verdict}");
        results.insert(word.to_string(), verdict);
    }

    results
}

/// Same as [`evaluate_words`], but returns the verdicts in the order of the
/// input, including repeated words.
pub fn evaluate_words_ordered<I, S>(dfa: &Automaton, words: I) -> Vec<(String, Verdict)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    debug_assert_deterministic(dfa);

    words
        .into_iter()
        .map(|word| {
            let word = word.as_ref();
            (word.to_string(), evaluate(dfa, word))
        })
        .collect()
}

/// Same as [`evaluate_words_ordered`], but evaluates the words in parallel.
/// The automaton is only read, so the words are evaluated independently.
pub fn evaluate_words_parallel<S>(dfa: &Automaton, words: &[S]) -> Vec<(String, Verdict)>
where
    S: AsRef<str> + Sync,
{
    debug_assert_deterministic(dfa);

    words
        .par_iter()
        .map(|word| {
            let word = word.as_ref();
            (word.to_string(), evaluate(dfa, word))
        })
        .collect()
}

/// Converts the automaton once with the subset construction and then
/// evaluates all the words on the result, see [`evaluate_words`].
pub fn process<I, S>(nfa: &Automaton, words: I) -> HashMap<String, Verdict>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let dfa = subset_construction(nfa);
    evaluate_words(&dfa, words)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::AutomatonBuilder;
    use crate::read_automaton;

    use super::*;

    fn ab_automaton() -> Automaton {
        let description = "a b\nq0 q1\nq1\nq0\nq0 a q1\nq1 b q1\n";
        subset_construction(&read_automaton(description.as_bytes()).unwrap())
    }

    #[test]
    fn test_evaluate_simple() {
        let dfa = ab_automaton();

        assert_eq!(evaluate(&dfa, "ab"), Verdict::Accept);
        assert_eq!(evaluate(&dfa, "abbb"), Verdict::Accept);
        assert_eq!(evaluate(&dfa, "a"), Verdict::Accept);
        assert_eq!(evaluate(&dfa, "ac"), Verdict::InvalidSymbol);
        assert_eq!(evaluate(&dfa, ""), Verdict::Reject);
        assert_eq!(evaluate(&dfa, "b"), Verdict::Reject);
        assert_eq!(evaluate(&dfa, "aa"), Verdict::Reject);
    }

    #[test]
    fn test_evaluate_invalid_symbol_short_circuits() {
        let dfa = ab_automaton();

        // The invalid symbol is found before the missing transition on the second a.
        assert_eq!(evaluate(&dfa, "axa"), Verdict::InvalidSymbol);
        // The dead state is reached before the invalid symbol is read.
        assert_eq!(evaluate(&dfa, "aax"), Verdict::Reject);
    }

    #[test]
    fn test_evaluate_epsilon_marker_in_word() {
        let dfa = ab_automaton();

        assert_eq!(evaluate(&dfa, "a&"), Verdict::Reject);
        assert_eq!(evaluate(&dfa, "&"), Verdict::Reject);
    }

    #[test]
    fn test_nondeterministic_branch() {
        let mut builder = AutomatonBuilder::new();
        builder
            .add_symbol("a")
            .add_state("q0")
            .add_state("q1")
            .add_accepting_state("q1")
            .set_initial_state("q0")
            .add_rule("q0", "a", "q0")
            .add_rule("q0", "a", "q1");
        let nfa = builder.finish().unwrap();

        let results = process(&nfa, ["a", "aaa", ""]);
        assert_eq!(results["a"], Verdict::Accept);
        assert_eq!(results["aaa"], Verdict::Accept);
        assert_eq!(results[""], Verdict::Reject);
    }

    #[test]
    fn test_epsilon_empty_word() {
        let mut builder = AutomatonBuilder::new();
        builder
            .add_symbol("a")
            .add_state("q0")
            .add_state("q1")
            .add_accepting_state("q1")
            .set_initial_state("q0")
            .add_rule("q0", EPSILON_MARKER, "q1")
            .add_rule("q1", "a", "q1");
        let nfa = builder.finish().unwrap();

        let results = process(&nfa, ["", "aa"]);
        assert_eq!(results[""], Verdict::Accept);
        assert_eq!(results["aa"], Verdict::Accept);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "deterministic automaton")]
    fn test_evaluate_words_requires_deterministic() {
        let nfa = read_automaton("a\nq0 q1\nq1\nq0\nq0 a q0\nq0 a q1\n".as_bytes()).unwrap();
        evaluate_words(&nfa, ["a"]);
    }

    #[test]
    fn test_evaluate_words_repeated() {
        let dfa = ab_automaton();
        let words = ["ab", "ac", "ab", ""];

        let keyed = evaluate_words(&dfa, words);
        assert_eq!(keyed.len(), 3);
        assert_eq!(keyed["ab"], Verdict::Accept);

        let ordered = evaluate_words_ordered(&dfa, words);
        assert_eq!(ordered.len(), 4);
        assert_eq!(ordered[2], ("ab".to_string(), Verdict::Accept));
        assert_eq!(ordered[3], (String::new(), Verdict::Reject));

        assert_eq!(evaluate_words_parallel(&dfa, &words), ordered);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accept.to_string(), "ACCEPT");
        assert_eq!(Verdict::Reject.to_string(), "REJECT");
        assert_eq!(Verdict::InvalidSymbol.to_string(), "INVALID_SYMBOL");
    }
}

use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use log::info;
use log::trace;
use streaming_iterator::StreamingIterator;
use thiserror::Error;

use autom_io::LineIterator;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::Location;
use crate::MalformedError;

/// The number of lines before the transition rules.
const HEADER_LINES: usize = 4;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The automaton description could not be read: {0}")]
    SourceUnavailable(#[from] io::Error),

    #[error("Malformed automaton description: {0}")]
    Malformed(#[from] MalformedError),
}

/// Loads an automaton from a textual description read from the given reader.
/// Note that the reader is buffered internally.
///
/// # Details
///
/// The description consists of at least five lines:
///
/// ```text
/// <symbol> <symbol> ...        the alphabet
/// <state> <state> ...          all states
/// <state> <state> ...          the accepting states, possibly none
/// <state>                      the initial state
/// <origin> <symbol> <destination>
/// ...
/// ```
///
/// Every line after the fourth is a transition rule where the symbol is
/// either in the alphabet or the epsilon marker `&`. Rules that share the
/// origin and symbol form a nondeterministic transition. An automaton
/// without transitions is described by a single blank fifth line, as
/// written by [`write_automaton`]; blank lines are rejected otherwise.
pub fn read_automaton(reader: impl Read) -> Result<Automaton, LoadError> {
    info!("Reading automaton description...");

    let mut lines = LineIterator::new(reader);
    let mut header: Vec<String> = Vec::with_capacity(HEADER_LINES);
    while header.len() < HEADER_LINES {
        match lines.next() {
            Some(line) => header.push(line.clone()),
            None => break,
        }
    }

    if header.len() < HEADER_LINES {
        if let Some(error) = lines.take_error() {
            return Err(read_error(error, lines.line_number() + 1));
        }

        return Err(MalformedError::Incomplete(header.len()).into());
    }

    let mut builder = AutomatonBuilder::new();
    for symbol in header[0].split_whitespace() {
        builder.add_symbol(symbol);
    }

    for state in header[1].split_whitespace() {
        builder.add_state(state);
    }

    for state in header[2].split_whitespace() {
        builder.add_accepting_state(state);
    }

    match header[3].split_whitespace().collect::<Vec<_>>().as_slice() {
        [initial] => {
            builder.set_initial_state(initial);
        }
        _ => return Err(MalformedError::InvalidInitialState(header[3].trim().to_string()).into()),
    }

    // The first blank rule line, only allowed when it is the only rule line.
    let mut blank_line: Option<Location> = None;
    loop {
        lines.advance();
        let Some(line) = lines.get() else {
            break;
        };
        let location = Location(Some(lines.line_number()));
        trace!("{line}");

        if let Some(blank) = blank_line {
            return Err(MalformedError::InvalidRule {
                location: blank,
                text: String::new(),
            }
            .into());
        }

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] if location.0 == Some(HEADER_LINES + 1) => blank_line = Some(location),
            [origin, symbol, destination] => {
                builder.add_rule_at(location, origin, symbol, destination);
            }
            _ => {
                return Err(MalformedError::InvalidRule {
                    location,
                    text: line.clone(),
                }
                .into());
            }
        }
    }

    if let Some(error) = lines.take_error() {
        return Err(read_error(error, lines.line_number() + 1));
    }

    if lines.line_number() == HEADER_LINES {
        return Err(MalformedError::Incomplete(HEADER_LINES).into());
    }

    let automaton = builder.finish()?;
    info!("Finished reading automaton with {} rules", builder.num_of_rules());

    Ok(automaton)
}

/// Classifies an error of the line reader, content that is not valid UTF-8
/// makes the description malformed rather than unreadable.
fn read_error(error: io::Error, line: usize) -> LoadError {
    if error.kind() == io::ErrorKind::InvalidData {
        MalformedError::InvalidEncoding {
            location: Location(Some(line)),
        }
        .into()
    } else {
        error.into()
    }
}

/// Loads an automaton from the description in the given file, see [`read_automaton`].
pub fn read_automaton_file(path: &Path) -> Result<Automaton, LoadError> {
    let file = File::open(path)?;
    read_automaton(file)
}

/// Writes the automaton in the description format read by
/// [`read_automaton`] to the given writer, with one rule per destination.
/// Note that the writer is buffered internally using a `BufWriter`.
///
/// An automaton without transitions is written with a blank fifth line, so
/// that the description remains complete.
pub fn write_automaton(writer: &mut impl Write, automaton: &Automaton) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "{}", automaton.alphabet().iter().format(" "))?;
    writeln!(
        writer,
        "{}",
        automaton.iter_states().map(|state| automaton.state_name(state)).format(" ")
    )?;
    writeln!(
        writer,
        "{}",
        automaton
            .accepting_states()
            .iter()
            .map(|state| automaton.state_name(*state))
            .format(" ")
    )?;
    writeln!(writer, "{}", automaton.state_name(automaton.initial_state_index()))?;

    if automaton.num_of_transitions() == 0 {
        writeln!(writer)?;
    }

    for (from, label, to) in automaton.iter_transitions() {
        writeln!(
            writer,
            "{} {} {}",
            automaton.state_name(from),
            automaton.label_name(label),
            automaton.state_name(to)
        )?;
    }

    writer.flush()
}

use std::fs::File;
use std::io::BufWriter;
use std::io::stdout;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use log::info;
use streaming_iterator::StreamingIterator;
use thiserror::Error;

use autom_automata::Automaton;
use autom_automata::LoadError;
use autom_automata::evaluate_words_ordered;
use autom_automata::read_automaton_file;
use autom_automata::subset_construction;
use autom_automata::write_automaton;
use autom_io::LineIterator;
use autom_tools::VerbosityFlag;
use autom_tools::Version;
use autom_tools::VersionFlag;
use autom_utilities::AutomError;
use autom_utilities::Timing;

#[derive(clap::Parser, Debug)]
#[command(
    about = "A command line tool for deciding whether words are accepted by finite automata",
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    version: VersionFlag,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[arg(long, global = true)]
    timings: bool,

    #[command(subcommand)]
    commands: Option<Commands>,
}

/// Defines the subcommands for this tool.
#[derive(Debug, Subcommand)]
enum Commands {
    Check(CheckArgs),
    Info(InfoArgs),
    Determinize(DeterminizeArgs),
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints for every word whether it is accepted by the given automaton")]
struct CheckArgs {
    /// The automaton description.
    filename: String,

    /// The words to check, use "" for the empty word.
    words: Vec<String>,

    #[arg(long, help = "Read additional words from the given file, one word per line")]
    words_file: Option<String>,
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints information related to the given automaton and its deterministic counterpart")]
struct InfoArgs {
    filename: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Writes the deterministic automaton obtained by the subset construction")]
struct DeterminizeArgs {
    filename: String,

    /// The output description, written to stdout when omitted.
    output: Option<String>,
}

fn main() -> Result<ExitCode, AutomError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if cli.version.into() {
        eprintln!("{}", Version);
        return Ok(ExitCode::SUCCESS);
    }

    let mut timing = Timing::new();

    if let Some(command) = cli.commands {
        match command {
            Commands::Check(args) => handle_check(args, &mut timing)?,
            Commands::Info(args) => handle_info(args, &mut timing)?,
            Commands::Determinize(args) => handle_determinize(args, &mut timing)?,
        }
    }

    if cli.timings {
        timing.print();
    }

    Ok(ExitCode::SUCCESS)
}

/// The automaton description in the given file could not be loaded.
#[derive(Error, Debug)]
#[error("{}: {source}", .path.display())]
struct InputError {
    path: PathBuf,
    source: LoadError,
}

/// Reads the automaton description from the given file.
fn read_input(filename: &str, timing: &mut Timing) -> Result<Automaton, AutomError> {
    let path = Path::new(filename);
    let automaton = timing
        .measure("read", || read_automaton_file(path))
        .map_err(|source| InputError {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(automaton)
}

/// Handle the `check` subcommand.
///
/// The automaton is converted once, after which all the words given on the
/// command line and in the words file are evaluated in order.
fn handle_check(args: CheckArgs, timing: &mut Timing) -> Result<(), AutomError> {
    let nfa = read_input(&args.filename, timing)?;

    let mut words = args.words;
    if let Some(filename) = args.words_file {
        let mut lines = LineIterator::new(File::open(&filename)?);
        while let Some(line) = lines.next() {
            words.push(line.clone());
        }

        if let Some(error) = lines.take_error() {
            return Err(error.into());
        }
    }

    let dfa = timing.measure("subset_construction", || subset_construction(&nfa));
    info!("Checking {} words", words.len());

    let results = timing.measure("evaluate", || evaluate_words_ordered(&dfa, &words));
    for (word, verdict) in results {
        println!("{word:?}: {verdict}");
    }

    Ok(())
}

/// Handle the `info` subcommand.
fn handle_info(args: InfoArgs, timing: &mut Timing) -> Result<(), AutomError> {
    let nfa = read_input(&args.filename, timing)?;
    println!("{nfa}");

    let dfa = timing.measure("subset_construction", || subset_construction(&nfa));
    println!("After subset construction:");
    println!("{dfa}");

    Ok(())
}

/// Handle the `determinize` subcommand.
fn handle_determinize(args: DeterminizeArgs, timing: &mut Timing) -> Result<(), AutomError> {
    let nfa = read_input(&args.filename, timing)?;
    let dfa = timing.measure("subset_construction", || subset_construction(&nfa));

    if let Some(file) = args.output {
        let mut writer = BufWriter::new(File::create(file)?);
        write_automaton(&mut writer, &dfa)?;
    } else {
        write_automaton(&mut stdout(), &dfa)?;
    }

    Ok(())
}

use clap::Args;
use log::LevelFilter;

#[derive(Args, Debug)]
pub struct VerbosityFlag {
    #[arg(short, long, global = true, help = "Set the verbosity to quiet")]
    quiet: bool,

    #[arg(short, long, global = true, help = "Set the verbosity to verbose")]
    verbose: bool,

    #[arg(short, long, global = true, help = "Set the verbosity to debug")]
    debug: bool,

    #[arg(short, long, global = true, help = "Set the verbosity to trace")]
    trace: bool,
}

impl VerbosityFlag {
    /// Returns the log level filter corresponding to the given verbosity flags,
    /// the most quiet flag wins and warnings are shown by default.
    pub fn log_level_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Off
        } else if self.trace {
            LevelFilter::Trace
        } else if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        verbosity: VerbosityFlag,
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.verbosity.log_level_filter(), LevelFilter::Warn);

        let cli = TestCli::parse_from(["test", "--debug"]);
        assert_eq!(cli.verbosity.log_level_filter(), LevelFilter::Debug);

        let cli = TestCli::parse_from(["test", "--quiet", "--trace"]);
        assert_eq!(cli.verbosity.log_level_filter(), LevelFilter::Off);
    }
}

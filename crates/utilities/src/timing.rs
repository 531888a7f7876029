use std::time::Duration;
use std::time::Instant;

use log::info;

/// Keeps track of the time spent in the named phases of a tool, printed at
/// the end when `--timings` is passed.
#[derive(Default)]
pub struct Timing {
    results: Vec<(String, Duration)>,
}

impl Timing {
    /// Creates a new timing object without any measurements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `phase` and records the elapsed time under the given name.
    pub fn measure<R>(&mut self, name: &str, phase: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = phase();
        let elapsed = start.elapsed();

        info!("Time {}: {:.3}s", name, elapsed.as_secs_f64());
        self.results.push((name.to_string(), elapsed));
        result
    }

    /// Prints all measurements to stderr, a phase that was measured multiple
    /// times is printed once with its total.
    pub fn print(&self) {
        let mut totals: Vec<(&str, Duration, usize)> = Vec::new();
        for (name, time) in &self.results {
            match totals.iter_mut().find(|(other, _, _)| other == name) {
                Some((_, total, count)) => {
                    *total += *time;
                    *count += 1;
                }
                None => totals.push((name, *time, 1)),
            }
        }

        for (name, total, count) in totals {
            if count == 1 {
                eprintln!("Time {}: {:.3}s", name, total.as_secs_f64());
            } else {
                eprintln!("Time {}: {:.3}s, n: {}", name, total.as_secs_f64(), count);
            }
        }
    }
}

use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use streaming_iterator::StreamingIterator;

/// A streaming iterator over the lines of a reader that reuses a single
/// buffer for every line. The reader is buffered internally.
///
/// Line terminators (`\n` and `\r\n`) are removed, and a final line
/// terminator does not produce an additional empty line. Reading stops at
/// the first I/O error, which can be retrieved with [`LineIterator::take_error`].
pub struct LineIterator<R: Read> {
    reader: BufReader<R>,
    buffer: String,
    line_number: usize,
    finished: bool,
    error: Option<io::Error>,
}

impl<R: Read> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: String::new(),
            line_number: 0,
            finished: false,
            error: None,
        }
    }

    /// Returns the 1-based number of the current line, zero before the first call to `advance`.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the error that stopped the iteration, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> StreamingIterator for LineIterator<R> {
    type Item = String;

    fn advance(&mut self) {
        if self.finished {
            return;
        }

        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => self.finished = true,
            Ok(_) => {
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                self.line_number += 1;
            }
            Err(error) => {
                self.error = Some(error);
                self.finished = true;
            }
        }
    }

    fn get(&self) -> Option<&Self::Item> {
        if self.finished { None } else { Some(&self.buffer) }
    }
}

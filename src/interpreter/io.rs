//! Input sources for `read`
//!
//! Input is a sequence of whitespace-separated tokens. [`QueueInput`] holds
//! them in memory; [`ReaderInput`] pulls lines from any [`BufRead`] only when
//! a `read` needs another token, so an interactive stdin works.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// A lazy source of input tokens.
///
/// Sources are `Send` so a run can move to a thread with a larger stack.
pub trait InputSource: Send {
    /// The next token, `Ok(None)` once the input is exhausted, or the
    /// error that stopped the source from producing one.
    fn next_token(&mut self) -> io::Result<Option<String>>;
}

/// Tokens held in memory.
#[derive(Debug, Clone, Default)]
pub struct QueueInput {
    tokens: VecDeque<String>,
}

impl QueueInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` on whitespace.
    pub fn from_text(text: &str) -> Self {
        Self {
            tokens: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            tokens: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl InputSource for QueueInput {
    fn next_token(&mut self) -> io::Result<Option<String>> {
        Ok(self.tokens.pop_front())
    }
}

/// Tokens read line by line from a reader.
pub struct ReaderInput<R: BufRead> {
    reader: R,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }
}

impl<R: BufRead + Send> InputSource for ReaderInput<R> {
    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() && !self.exhausted {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                self.exhausted = true;
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_queue_input() {
        let mut input = QueueInput::from_text(" 3\n -7  true ");
        assert_eq!(input.remaining(), 3);
        assert_eq!(input.next_token().unwrap().as_deref(), Some("3"));
        assert_eq!(input.next_token().unwrap().as_deref(), Some("-7"));
        assert_eq!(input.next_token().unwrap().as_deref(), Some("true"));
        assert_eq!(input.next_token().unwrap(), None);

        let mut input = QueueInput::from_values([1, 2]);
        assert_eq!(input.next_token().unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_reader_input_skips_blank_lines() {
        let mut input = ReaderInput::new(Cursor::new("1 2\n\n   \n3\n"));
        let tokens: Vec<String> = std::iter::from_fn(|| input.next_token().unwrap()).collect();
        assert_eq!(tokens, ["1", "2", "3"]);
        assert_eq!(input.next_token().unwrap(), None);
    }

    #[test]
    fn test_reader_input_reports_invalid_utf8() {
        let mut input = ReaderInput::new(Cursor::new(vec![0xff, 0xfe, b'\n', b'5', b'\n']));
        let err = input.next_token().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

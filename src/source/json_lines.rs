//! Newline-delimited JSON event reader.

use super::Event;
use std::io::BufRead;
use thiserror::Error;

/// Errors produced while reading events.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading from the underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not valid JSON.
    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        /// One-based line number.
        line: u64,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads one event per line. Blank lines are skipped.
///
/// A malformed line yields an error item and reading continues with the
/// next line; an I/O error ends the stream.
pub struct JsonLinesSource<R> {
    reader: R,
    line: u64,
    buf: String,
    failed: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Reads events from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<Event, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(text)
                    .map(Event::new)
                    .map_err(|source| SourceError::Parse {
                        line: self.line,
                        source,
                    }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_reads_events_and_skips_blank_lines() {
        let input = "{\"n\": 1}\n\n   \n{\"n\": 2}\n";
        let events: Vec<Event> = JsonLinesSource::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events, vec![Event::new(json!({"n": 1})), Event::new(json!({"n": 2}))]);
    }

    #[test]
    fn test_bad_line_does_not_stop_reading() {
        let input = "{\"n\": 1}\nnot json\n{\"n\": 3}";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert!(source.next().unwrap().is_ok());
        assert!(matches!(
            source.next().unwrap(),
            Err(SourceError::Parse { line: 2, .. })
        ));
        assert_eq!(source.next().unwrap().unwrap().record(), &json!({"n": 3}));
        assert!(source.next().is_none());
        assert_eq!(source.lines_read(), 3);
    }
}

//! Line source for the state machine
//!
//! Lines are returned with their original terminator so object bodies are
//! reproduced byte for byte. The reader refuses lines longer than the
//! configured buffer instead of silently splitting them.

use crate::error::{Result, SplitError};
use std::io::{BufRead, Read};
use tracing::warn;

/// Bounded line reader over any buffered input
#[derive(Debug)]
pub struct DumpReader<R> {
    inner: R,
    max_line: usize,
    lines: u64,
    bytes: u64,
    lossy: bool,
}

impl<R: BufRead> DumpReader<R> {
    /// `max_line` is the longest accepted line in bytes, terminator included.
    pub fn new(inner: R, max_line: usize) -> Self {
        Self {
            inner,
            max_line: max_line.max(1),
            lines: 0,
            bytes: 0,
            lossy: false,
        }
    }

    /// Lines successfully read so far
    pub fn lines_read(&self) -> u64 {
        self.lines
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }

    /// Read the next line, `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let line_no = self.lines + 1;
        let mut buf = Vec::new();

        let read = (&mut self.inner)
            .take(self.max_line as u64)
            .read_until(b'\n', &mut buf)
            .map_err(|source| SplitError::Stream {
                line: line_no,
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }

        if read == self.max_line && buf.last() != Some(&b'\n') {
            let more = self
                .inner
                .fill_buf()
                .map_err(|source| SplitError::Stream {
                    line: line_no,
                    source,
                })?;

            if !more.is_empty() {
                return Err(SplitError::LineTooLong {
                    line: line_no,
                    limit: self.max_line,
                });
            }
        }

        self.lines = line_no;
        self.bytes += read as u64;

        match String::from_utf8(buf) {
            Ok(line) => Ok(Some(line)),
            Err(err) => {
                if !self.lossy {
                    warn!(line = line_no, "Input is not valid UTF-8, invalid bytes are replaced");
                    self.lossy = true;
                }
                Ok(Some(String::from_utf8_lossy(err.as_bytes()).into_owned()))
            },
        }
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

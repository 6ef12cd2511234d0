//! Line assembly over a byte source.
//!
//! Serial reads arrive in arbitrary chunks: half a record, several records,
//! or nothing at all. [`LineReader`] accumulates bytes in a bounded buffer
//! and hands out complete lines with the terminator (and an optional
//! preceding carriage-return) stripped.

use std::collections::VecDeque;

use crate::source::{ByteSource, ReadStatus, SourceError};

/// Size of the transient read chunk handed to the source per poll.
const CHUNK_SIZE: usize = 256;

/// Assembles newline-terminated lines from a [`ByteSource`].
///
/// A line that outgrows the configured capacity without a terminator is
/// dropped in its entirety (the remainder is swallowed up to the next
/// terminator) and counted in [`LineReader::overflow_count`]. Blank lines
/// are skipped, so `\r\n\r\n` runs do not surface as records.
pub struct LineReader<S> {
    source: S,
    pending: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
    line_capacity: usize,
    discarding: bool,
    overflow_count: u64,
}

impl<S: ByteSource> LineReader<S> {
    /// Wrap `source`, assembling lines of at most `line_capacity` bytes.
    pub fn new(source: S, line_capacity: usize) -> Self {
        Self {
            source,
            pending: Vec::with_capacity(line_capacity),
            ready: VecDeque::new(),
            line_capacity,
            discarding: false,
            overflow_count: 0,
        }
    }

    /// Pull the next complete line.
    ///
    /// Returns `Ok(Some(line))` as soon as one is available, `Ok(None)` when
    /// the source has no more data right now (the caller backs off), and
    /// `Err` on a fatal source failure. Reads as much as the source offers
    /// before reporting `None`, so a single poll drains a burst of records.
    pub fn poll_line(&mut self) -> Result<Option<String>, SourceError> {
        loop {
            if let Some(line) = self.take_ready() {
                return Ok(Some(line));
            }
            let mut chunk = [0u8; CHUNK_SIZE];
            match self.source.read(&mut chunk)? {
                ReadStatus::WouldBlock => return Ok(None),
                ReadStatus::Data(n) => self.accept(&chunk[..n]),
            }
        }
    }

    /// Number of lines dropped because they outgrew the buffer.
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }

    fn accept(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                if self.discarding {
                    // End of an overlong line: resume normal assembly.
                    self.discarding = false;
                    continue;
                }
                let mut line = std::mem::take(&mut self.pending);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                self.ready.push_back(line);
            } else if self.discarding {
                // Swallowing the rest of an overlong line.
            } else if self.pending.len() < self.line_capacity {
                self.pending.push(b);
            } else {
                self.pending.clear();
                self.discarding = true;
                self.overflow_count += 1;
            }
        }
    }

    fn take_ready(&mut self) -> Option<String> {
        while let Some(raw) = self.ready.pop_front() {
            if raw.is_empty() {
                continue;
            }
            // The wire format is ASCII; stray bytes become U+FFFD here and
            // fail numeric parsing downstream, rejecting the record.
            return Some(String::from_utf8_lossy(&raw).into_owned());
        }
        None
    }
}

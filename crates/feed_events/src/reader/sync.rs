use std::io::{self, Read};

const CHUNK_SIZE_BYTES: usize = 8192;

/// One line of input, or the reason it could not be produced.
#[derive(Debug)]
pub enum BoundedLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    /// The line exceeded the limit; its bytes were dropped as they arrived.
    LineTooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    /// Reading failed. Iteration ends after this item.
    IoError {
        line_number: usize,
        kind: io::ErrorKind,
    },
}

/// Splits a reader into `\n`-terminated lines, holding at most `max_line_bytes` of any one line.
pub struct SyncBoundedLineReader<R: Read> {
    reader: R,
    max_line_bytes: usize,
    chunk: Box<[u8; CHUNK_SIZE_BYTES]>,
    chunk_pos: usize,
    chunk_len: usize,
    pending: Vec<u8>,
    observed_bytes: usize,
    overflowed: bool,
    line_number: usize,
    done: bool,
}

impl<R: Read> SyncBoundedLineReader<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            max_line_bytes,
            chunk: Box::new([0u8; CHUNK_SIZE_BYTES]),
            chunk_pos: 0,
            chunk_len: 0,
            pending: Vec::new(),
            observed_bytes: 0,
            overflowed: false,
            line_number: 0,
            done: false,
        }
    }

    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn refill(&mut self) -> io::Result<usize> {
        self.chunk_pos = 0;
        self.chunk_len = 0;
        loop {
            match self.reader.read(&mut self.chunk[..]) {
                Ok(n) => {
                    self.chunk_len = n;
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Appends `segment` to the current line, switching to discard mode past the limit.
    fn take_segment(&mut self, start: usize, end: usize) {
        self.observed_bytes = self.observed_bytes.saturating_add(end - start);
        if self.overflowed {
            return;
        }
        if self.observed_bytes > self.max_line_bytes {
            self.overflowed = true;
            self.pending = Vec::new();
            return;
        }
        self.pending.extend_from_slice(&self.chunk[start..end]);
    }

    fn finish_line(&mut self) -> BoundedLine {
        self.line_number += 1;
        let line_number = self.line_number;
        let observed_bytes = std::mem::take(&mut self.observed_bytes);
        let bytes = std::mem::take(&mut self.pending);

        if std::mem::take(&mut self.overflowed) {
            return BoundedLine::LineTooLong {
                line_number,
                observed_bytes,
                max_line_bytes: self.max_line_bytes,
            };
        }
        BoundedLine::Line { line_number, bytes }
    }

    fn has_partial_line(&self) -> bool {
        self.overflowed || !self.pending.is_empty()
    }
}

impl<R: Read> Iterator for SyncBoundedLineReader<R> {
    type Item = BoundedLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.chunk_pos >= self.chunk_len {
                match self.refill() {
                    Ok(0) => {
                        self.done = true;
                        return self.has_partial_line().then(|| self.finish_line());
                    }
                    Ok(_) => {}
                    Err(err) => {
                        self.done = true;
                        self.line_number += 1;
                        return Some(BoundedLine::IoError {
                            line_number: self.line_number,
                            kind: err.kind(),
                        });
                    }
                }
            }

            let start = self.chunk_pos;
            let end = self.chunk_len;
            match self.chunk[start..end].iter().position(|b| *b == b'\n') {
                Some(offset) => {
                    self.take_segment(start, start + offset);
                    self.chunk_pos = start + offset + 1;
                    return Some(self.finish_line());
                }
                None => {
                    self.take_segment(start, end);
                    self.chunk_pos = end;
                }
            }
        }
    }
}

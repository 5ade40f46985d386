//! A small tokenizer for line based text formats.

use std::{
    io::{self, BufRead},
    str::{FromStr, SplitWhitespace},
};

use crate::io::Error;


/// Reads a text file line by line, strips `#` comments and splits each
/// non-empty line into a keyword and whitespace separated arguments.
///
/// The line buffer is reused for all lines.
#[derive(Debug)]
pub(crate) struct LineReader<R: BufRead> {
    reader: R,
    buf: String,
    line: usize,
    bytes_read: u64,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
            bytes_read: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the next line that contains anything but whitespace and
    /// comments, or `None` at the end of the input.
    pub(crate) fn next_line(&mut self) -> Result<Option<Line<'_>>, Error> {
        loop {
            self.buf.clear();
            self.line += 1;

            let n = match self.reader.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    return Err(Error::parse("line is not valid UTF-8", self.line));
                }
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                return Ok(None);
            }
            self.bytes_read += n as u64;

            let content = match self.buf.find('#') {
                Some(pos) => &self.buf[..pos],
                None => &self.buf[..],
            };
            if content.trim().is_empty() {
                continue;
            }

            // Re-borrow, so that the returned borrow starts after the
            // `continue` above.
            let end = content.len();
            let mut tokens = self.buf[..end].split_whitespace();
            let keyword = tokens.next().unwrap_or("");
            return Ok(Some(Line {
                number: self.line,
                keyword,
                args: tokens,
            }));
        }
    }
}

/// One non-empty line of input.
#[derive(Debug, Clone)]
pub(crate) struct Line<'a> {
    number: usize,
    keyword: &'a str,
    args: SplitWhitespace<'a>,
}

impl<'a> Line<'a> {
    /// The 1-based line number.
    pub(crate) fn number(&self) -> usize {
        self.number
    }

    /// The first token of the line.
    pub(crate) fn keyword(&self) -> &'a str {
        self.keyword
    }

    /// All tokens after the keyword.
    pub(crate) fn args(&self) -> SplitWhitespace<'a> {
        self.args.clone()
    }

    pub(crate) fn error(&self, msg: impl Into<String>) -> Error {
        Error::parse(msg, self.number)
    }

    /// Parses `token` as number, with an error pointing to this line.
    pub(crate) fn parse<T: FromStr>(&self, token: &str) -> Result<T, Error> {
        token.parse().map_err(|_| self.error(format!("invalid number '{}'", token)))
    }

    /// Parses exactly `N` arguments as numbers.
    pub(crate) fn parse_args<T: FromStr + Default + Copy, const N: usize>(&self) -> Result<[T; N], Error> {
        let mut out = [T::default(); N];
        let mut args = self.args();
        for v in &mut out {
            let token = args.next().ok_or_else(|| {
                self.error(format!("'{}' needs {} values", self.keyword, N))
            })?;
            *v = self.parse(token)?;
        }

        Ok(out)
    }
}

//! RFC 4180 style tokenizer for delimited text.
//! Quoted fields may hold the delimiter, line breaks and `""` escaped quotes.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Errors raised while tokenizing delimited text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// End of input was reached inside a quoted field.
    #[error("unterminated quote: quoted field opened on line {line} is never closed")]
    UnterminatedQuote { line: usize },

    /// A closing quote is followed by something other than a delimiter, line break or end of input.
    #[error("unexpected quote: closing quote followed by '{found}' at line {line}, column {column}")]
    UnexpectedQuote { line: usize, column: usize, found: char },

    /// The delimiter collides with the quote or line break characters.
    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(char),
}

impl ParseError {
    /// Machine-checkable kind of the error.
    pub const fn kind(&self) -> &'static str {
        match self {
            ParseError::UnterminatedQuote { .. } => "unterminated quote",
            ParseError::UnexpectedQuote { .. } => "unexpected quote",
            ParseError::InvalidDelimiter(_) => "invalid delimiter",
        }
    }
}

/// How a field ended.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Terminator {
    Delimiter,
    Newline,
    Eof,
}

/// Streaming record reader over an in-memory text.
pub struct CsvReader<'a> {
    /// Remaining characters
    chars: Peekable<Chars<'a>>,
    /// Field delimiter
    delimiter: char,
    /// Skip records produced by physically blank lines
    skip_empty_lines: bool,
    /// Current line (1-based)
    line: usize,
    /// Characters consumed on the current line
    column: usize,
    /// Set once input is exhausted or an error was yielded
    done: bool,
}

impl<'a> CsvReader<'a> {
    /// Creates a reader over `text`, splitting fields on `delimiter`.
    pub fn new(text: &'a str, delimiter: char) -> Result<Self, ParseError> {
        if matches!(delimiter, '"' | '\n' | '\r') {
            Err(ParseError::InvalidDelimiter(delimiter))?;
        }
        Ok(CsvReader {
            chars: text.chars().peekable(),
            delimiter,
            skip_empty_lines: false,
            line: 1,
            column: 0,
            done: false,
        })
    }

    /// Drops records that come from lines with no characters at all.
    pub fn skip_empty_lines(mut self, skip: bool) -> Self {
        self.skip_empty_lines = skip;
        self
    }

    /// Consumes one character, keeping line and column counters in step.
    fn bump(&mut self) -> Option<char> {
        let char = self.chars.next()?;
        let ends_line = char == '\n' || (char == '\r' && self.chars.peek() != Some(&'\n'));
        if ends_line {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(char)
    }

    /// Consumes a line break starting with `\r` or `\n` (CRLF counts once).
    fn bump_newline(&mut self) {
        if self.bump() == Some('\r') && self.chars.peek() == Some(&'\n') {
            self.bump();
        }
    }

    /// Reads an unquoted field. Quotes inside it are kept literally.
    fn read_plain_field(&mut self) -> (String, Terminator) {
        let mut field = String::new();
        loop {
            match self.chars.peek().copied() {
                None => return (field, Terminator::Eof),
                Some(char) if char == self.delimiter => {
                    self.bump();
                    return (field, Terminator::Delimiter);
                }
                Some('\n') | Some('\r') => {
                    self.bump_newline();
                    return (field, Terminator::Newline);
                }
                Some(char) => {
                    self.bump();
                    field.push(char);
                }
            }
        }
    }

    /// Reads a quoted field starting at the opening quote.
    fn read_quoted_field(&mut self) -> Result<(String, Terminator), ParseError> {
        let line = self.line;
        let mut field = String::new();
        self.bump();
        loop {
            match self.bump() {
                None => Err(ParseError::UnterminatedQuote { line })?,
                Some('"') if self.chars.peek() == Some(&'"') => {
                    self.bump();
                    field.push('"');
                }
                Some('"') => break,
                Some(char) => field.push(char),
            }
        }
        match self.chars.peek().copied() {
            None => Ok((field, Terminator::Eof)),
            Some(char) if char == self.delimiter => {
                self.bump();
                Ok((field, Terminator::Delimiter))
            }
            Some('\n') | Some('\r') => {
                self.bump_newline();
                Ok((field, Terminator::Newline))
            }
            Some(found) => Err(ParseError::UnexpectedQuote {
                line: self.line,
                column: self.column + 1,
                found,
            }),
        }
    }

    /// Reads one record. The flag is true when the record came from a blank line.
    fn read_record(&mut self) -> Result<(Vec<String>, bool), ParseError> {
        let mut fields = Vec::new();
        let mut blank = true;
        loop {
            let (field, terminator) = if self.chars.peek() == Some(&'"') {
                blank = false;
                self.read_quoted_field()?
            } else {
                self.read_plain_field()
            };
            if !field.is_empty() || terminator == Terminator::Delimiter {
                blank = false;
            }
            fields.push(field);
            if terminator != Terminator::Delimiter {
                return Ok((fields, blank));
            }
        }
    }
}

impl Iterator for CsvReader<'_> {
    type Item = Result<Vec<String>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.chars.peek().is_none() {
                self.done = true;
                break;
            }
            match self.read_record() {
                Ok((_, true)) if self.skip_empty_lines => continue,
                Ok((fields, _)) => return Some(Ok(fields)),
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }
        None
    }
}

/// Quotes a field when it holds the delimiter, a quote or a line break.
/// Embedded quotes are doubled so the reader restores the exact value.
pub fn escape_field(value: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|char| char == delimiter || matches!(char, '"' | '\n' | '\r'));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Joins fields into one delimited line (without a line terminator).
pub fn join_record<S: AsRef<str>>(fields: &[S], delimiter: char) -> String {
    let separator = delimiter.to_string();
    fields
        .iter()
        .map(|field| escape_field(field.as_ref(), delimiter))
        .collect::<Vec<_>>()
        .join(&separator)
}

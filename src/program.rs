//! Program text as handed to the interpreter.
//!
//! A [`Program`] keeps the source twice: as the original lines (so syntax
//! errors can point at a line and character) and as one flattened stream of
//! characters that the engine walks with its instruction pointer. Characters
//! outside the instruction set stay in both views; the engine skips them.

use std::fmt;

/// One of the eight recognised instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `+`
    IncrementCell,
    /// `-`
    DecrementCell,
    /// `>`
    IncrementPointer,
    /// `<`
    DecrementPointer,
    /// `,`
    Input,
    /// `.`
    Output,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Op {
    /// Decode a source character. Returns `None` for anything outside `+-<>.,[]`.
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::IncrementCell),
            '-' => Some(Op::DecrementCell),
            '>' => Some(Op::IncrementPointer),
            '<' => Some(Op::DecrementPointer),
            ',' => Some(Op::Input),
            '.' => Some(Op::Output),
            '[' => Some(Op::LoopStart),
            ']' => Some(Op::LoopEnd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Op::IncrementCell => '+',
            Op::DecrementCell => '-',
            Op::IncrementPointer => '>',
            Op::DecrementPointer => '<',
            Op::Input => ',',
            Op::Output => '.',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Source lines plus the flattened instruction stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<String>,
    flat: Vec<char>,
}

impl Program {
    /// Split `source` into lines (`\n` or `\r\n`) and flatten them.
    pub fn from_source(source: &str) -> Self {
        Self::from_lines(source.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let flat = lines.iter().flat_map(|line| line.chars()).collect();
        Self { lines, flat }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The flattened character stream, newlines removed.
    pub fn chars(&self) -> &[char] {
        &self.flat
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// The instruction at `ip`, or `None` for a skipped character or an index past the end.
    pub fn op_at(&self, ip: usize) -> Option<Op> {
        self.flat.get(ip).copied().and_then(Op::from_char)
    }

    /// Text of a 1-based source line.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Program::from_source(source)
    }
}

//! Bracket-balance validation run before any instruction executes.
//!
//! The validator is single-error: it stops at the first `]` that has nothing
//! to close, or, when the scan finishes with brackets still open, reports the
//! outermost `[` that was never closed. Both locations are 1-based
//! `(line, char)` pairs where `char` counts characters within the line.

use std::fmt;

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxResult {
    Valid,
    UnexpectedClosingBracket { line: usize, column: usize },
    UnclosedOpeningBracket { line: usize, column: usize },
}

impl SyntaxResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, SyntaxResult::Valid)
    }

    pub fn into_result(self) -> Result<(), SyntaxError> {
        match self {
            SyntaxResult::Valid => Ok(()),
            SyntaxResult::UnexpectedClosingBracket { line, column } => {
                Err(SyntaxError::UnexpectedClosingBracket { line, column })
            }
            SyntaxResult::UnclosedOpeningBracket { line, column } => {
                Err(SyntaxError::UnclosedOpeningBracket { line, column })
            }
        }
    }
}

impl fmt::Display for SyntaxResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.into_result() {
            Ok(()) => write!(f, "Valid Code"),
            Err(err) => write!(f, "{err}"),
        }
    }
}

/// A program rejected before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected Closing Bracket at [line: {line} | char: {column}]")]
    UnexpectedClosingBracket { line: usize, column: usize },

    #[error("Unclosed Opening Bracket at [line: {line} | char: {column}]")]
    UnclosedOpeningBracket { line: usize, column: usize },
}

impl SyntaxError {
    /// 1-based `(line, char)` of the offending bracket.
    pub fn location(&self) -> (usize, usize) {
        match *self {
            SyntaxError::UnexpectedClosingBracket { line, column }
            | SyntaxError::UnclosedOpeningBracket { line, column } => (line, column),
        }
    }
}

/// Check that every `[` has a matching `]` across `lines`.
pub fn validate<S: AsRef<str>>(lines: &[S]) -> SyntaxResult {
    let mut opening = 0usize;
    let mut closing = 0usize;
    let mut unclosed = (0, 0);

    for (line_index, line) in lines.iter().enumerate() {
        for (char_index, c) in line.as_ref().chars().enumerate() {
            let here = (line_index + 1, char_index + 1);
            match c {
                '[' => {
                    // Only a bracket opening a new outermost level is a candidate.
                    if opening == closing {
                        unclosed = here;
                    }
                    opening += 1;
                }
                ']' => {
                    if opening == closing {
                        return SyntaxResult::UnexpectedClosingBracket {
                            line: here.0,
                            column: here.1,
                        };
                    }
                    closing += 1;
                }
                _ => {}
            }
        }
    }

    if opening > closing {
        SyntaxResult::UnclosedOpeningBracket {
            line: unclosed.0,
            column: unclosed.1,
        }
    } else {
        SyntaxResult::Valid
    }
}

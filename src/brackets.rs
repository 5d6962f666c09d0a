//! Bracket-pair resolution.
//!
//! [`resolve`] scans the flattened program from a bracket to its partner by
//! depth counting. [`JumpTable`] computes every pair once with a stack so the
//! engine can jump in O(1); both agree on every bracket of a balanced program.

/// Resolution failures. These only happen when the engine is handed a
/// position or a program that validation never certified, so they indicate a
/// defect rather than bad user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    #[error("tried to resolve a partner for a non-bracket position {index} ({found:?})")]
    NotABracket { index: usize, found: Option<char> },

    #[error("bracket at position {index} has no partner")]
    Unmatched { index: usize },
}

/// Find the bracket matching the one at `index`.
pub fn resolve(flat: &[char], index: usize) -> Result<usize, BracketError> {
    let mut depth = 1usize;

    match flat.get(index).copied() {
        Some('[') => {
            for (i, &c) in flat.iter().enumerate().skip(index + 1) {
                match c {
                    '[' => depth += 1,
                    ']' => depth -= 1,
                    _ => continue,
                }
                if depth == 0 {
                    return Ok(i);
                }
            }
        }
        Some(']') => {
            // Position 0 is included: a `[` there is a legitimate partner.
            for i in (0..index).rev() {
                match flat[i] {
                    ']' => depth += 1,
                    '[' => depth -= 1,
                    _ => continue,
                }
                if depth == 0 {
                    return Ok(i);
                }
            }
        }
        found => return Err(BracketError::NotABracket { index, found }),
    }

    Err(BracketError::Unmatched { index })
}

/// Precomputed partner for every bracket position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    // targets[i] holds the matching index for '[' or ']' at i, None elsewhere.
    targets: Vec<Option<usize>>,
}

impl JumpTable {
    pub fn build(flat: &[char]) -> Result<Self, BracketError> {
        let mut targets = vec![None; flat.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, &c) in flat.iter().enumerate() {
            if c == '[' {
                stack.push(i);
            } else if c == ']' {
                let Some(open_index) = stack.pop() else {
                    return Err(BracketError::Unmatched { index: i });
                };
                targets[open_index] = Some(i);
                targets[i] = Some(open_index);
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(BracketError::Unmatched { index: unmatched_open });
        }

        Ok(Self { targets })
    }

    /// Partner of the bracket at `index`, `None` if `index` is not a bracket.
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.targets.get(index).copied().flatten()
    }

    /// Number of bracket pairs.
    pub fn pairs(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count() / 2
    }
}

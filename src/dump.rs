//! Human-readable rendering of a tape.
//!
//! Each row starts with the index of its first cell, then the cell values in
//! fixed-width decimal, then the same cells as characters:
//!
//! ```text
//! 00000: 072 105 000 000 000 000 000 000 000 000 000 000 Hi..........
//! ```
//!
//! Row width depends on the cell width (12, 8 or 4 cells). Addresses are
//! padded to the digit count of the tape length and values to the digit count
//! of the largest cell value. The character column only shows graphic ASCII;
//! everything else, including zero and whitespace, is a `.`. When the last
//! row is short, the missing cells are left blank in both columns.

use std::fmt;

use crate::tape::Tape;

/// Display adapter that renders a [`Tape`] as a memory dump.
pub struct MemoryDump<'a> {
    tape: &'a Tape,
}

impl<'a> MemoryDump<'a> {
    pub fn new(tape: &'a Tape) -> Self {
        Self { tape }
    }
}

impl fmt::Display for MemoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.tape.cell_width();
        let per_row = width.cells_per_row();
        let value_width = digits(u64::from(width.max_value()));
        let address_width = digits(self.tape.len() as u64);

        for (row_index, row) in self.tape.cells().chunks(per_row).enumerate() {
            let missing = per_row - row.len();

            write!(f, "{:0address_width$}: ", row_index * per_row)?;
            for value in row {
                write!(f, "{value:0value_width$} ")?;
            }
            for _ in 0..missing {
                write!(f, "{:value_width$} ", "")?;
            }
            for &value in row {
                write!(f, "{}", printable(value))?;
            }
            write!(f, "{:missing$}", "")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render `tape` into a string.
pub fn render(tape: &Tape) -> String {
    MemoryDump::new(tape).to_string()
}

fn digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

fn printable(value: u32) -> char {
    match u8::try_from(value) {
        Ok(b) if b.is_ascii_graphic() => char::from(b),
        _ => '.',
    }
}

//! The memory tape: a fixed number of cells and one data pointer.
//!
//! Both the pointer and the cell values wrap. Moving left from cell 0 lands
//! on the last cell, and decrementing a zero cell yields the width's maximum.

use std::collections::TryReserveError;
use std::fmt;
use std::num::NonZeroUsize;

/// Default number of cells.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// Bit width of a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellWidth {
    #[default]
    Bits8,
    Bits16,
    Bits32,
}

impl CellWidth {
    /// Map a bit count to a width; only 8, 16 and 32 are supported.
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(CellWidth::Bits8),
            16 => Some(CellWidth::Bits16),
            32 => Some(CellWidth::Bits32),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CellWidth::Bits8 => 8,
            CellWidth::Bits16 => 16,
            CellWidth::Bits32 => 32,
        }
    }

    /// Largest value a cell can hold (`2^bits - 1`).
    pub fn max_value(self) -> u32 {
        match self {
            CellWidth::Bits8 => u32::from(u8::MAX),
            CellWidth::Bits16 => u32::from(u16::MAX),
            CellWidth::Bits32 => u32::MAX,
        }
    }

    /// Cells per row in a memory dump.
    pub fn cells_per_row(self) -> usize {
        match self {
            CellWidth::Bits8 => 12,
            CellWidth::Bits16 => 8,
            CellWidth::Bits32 => 4,
        }
    }
}

impl fmt::Display for CellWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Shape of a tape: cell width and number of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeConfig {
    pub cell_width: CellWidth,
    pub memory_size: NonZeroUsize,
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            cell_width: CellWidth::default(),
            memory_size: NonZeroUsize::new(DEFAULT_MEMORY_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    #[error("cannot allocate a tape of {cells} cells: {source}")]
    Allocation {
        cells: usize,
        #[source]
        source: TryReserveError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u32>,
    pointer: usize,
    width: CellWidth,
}

impl Tape {
    /// A zeroed tape with the pointer on cell 0.
    ///
    /// # Panics
    ///
    /// Panics if the cells cannot be allocated. Use [`Tape::try_new`] for
    /// sizes that come from user input.
    pub fn new(config: TapeConfig) -> Self {
        Self {
            cells: vec![0; config.memory_size.get()],
            pointer: 0,
            width: config.cell_width,
        }
    }

    /// Like [`Tape::new`], but reports an allocation failure instead of aborting.
    pub fn try_new(config: TapeConfig) -> Result<Self, TapeError> {
        let size = config.memory_size.get();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|source| TapeError::Allocation { cells: size, source })?;
        cells.resize(size, 0);
        Ok(Self {
            cells,
            pointer: 0,
            width: config.cell_width,
        })
    }

    pub fn read(&self) -> u32 {
        self.cells[self.pointer]
    }

    /// Store `value` in the current cell, reduced modulo `max_value + 1`.
    pub fn write(&mut self, value: u32) {
        self.cells[self.pointer] = value & self.width.max_value();
    }

    pub fn increment_cell(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1) & self.width.max_value();
    }

    pub fn decrement_cell(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1) & self.width.max_value();
    }

    pub fn increment_pointer(&mut self) {
        self.pointer = if self.pointer == self.cells.len() - 1 {
            0
        } else {
            self.pointer + 1
        };
    }

    pub fn decrement_pointer(&mut self) {
        self.pointer = if self.pointer == 0 {
            self.cells.len() - 1
        } else {
            self.pointer - 1
        };
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_width(&self) -> CellWidth {
        self.width
    }

    pub fn max_value(&self) -> u32 {
        self.width.max_value()
    }
}

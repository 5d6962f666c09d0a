//! An interpreter for the eight-symbol tape-machine language.
//!
//! Programs operate on a tape of cells (30,000 by default) with a single data
//! pointer.
//!
//! Features and behaviors:
//! - Cells are 8, 16 or 32 bits wide and wrap on overflow and underflow.
//! - The pointer wraps around both ends of the tape.
//! - Input `,` consumes the next byte of a fixed input sequence (the next
//!   UTF-8 character with 16/32-bit cells); once the input is exhausted it
//!   leaves the current cell unchanged.
//! - Output `.` emits the current cell as a character code.
//! - Brackets are validated before anything runs; the first unmatched one is
//!   reported with its 1-based line and character.
//! - Characters outside `+-<>.,[]` are comments and are skipped.
//!
//! Quick start:
//!
//! ```
//! use bf_tape::{run, Program, TapeConfig};
//!
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let exec = run(Program::from_source(code), b"", TapeConfig::default()).expect("program should run");
//! assert_eq!(exec.output, b"Hello World!\n");
//! ```

pub mod brackets;
pub mod config;
pub mod dump;
pub mod engine;
pub mod program;
pub mod syntax;
pub mod tape;

pub mod cli_util;
pub mod commands;

pub use brackets::{resolve, BracketError, JumpTable};
pub use dump::MemoryDump;
pub use engine::{run, Execution, Interpreter, RunError};
pub use program::{Op, Program};
pub use syntax::{validate, SyntaxError, SyntaxResult};
pub use tape::{CellWidth, Tape, TapeConfig, TapeError, DEFAULT_MEMORY_SIZE};

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default filter, which only shows warnings.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

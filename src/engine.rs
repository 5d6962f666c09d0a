//! The fetch-execute loop.
//!
//! An [`Interpreter`] owns everything a run touches: the program, the tape,
//! the input bytes and their cursor, the collected output, and the counters.
//! Nothing is global, so independent interpreters can run side by side.
//!
//! Behaviour per instruction:
//! - `+`/`-` wrap the current cell at the configured width.
//! - `>`/`<` wrap the pointer around the tape.
//! - `,` reads the next input value into the cell: one byte with 8-bit cells,
//!   one UTF-8 encoded code point with wider cells (malformed sequences read
//!   as U+FFFD). Once input is exhausted it leaves the cell untouched.
//! - `.` emits the cell as a character code. With 8-bit cells that is the raw
//!   byte; wider cells are treated as Unicode code points and emitted as
//!   UTF-8, invalid code points becoming U+FFFD.
//! - `[`/`]` jump to the matching bracket when the cell is zero / non-zero.
//!
//! There is no step limit: a program that never leaves a loop never returns.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::brackets::{BracketError, JumpTable};
use crate::program::{Op, Program};
use crate::syntax::{validate, SyntaxError};
use crate::tape::{CellWidth, Tape, TapeConfig};

/// Errors returned by [`Interpreter::run`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The program failed validation; nothing was executed.
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Jump resolution failed on a validated program. This is a bug in the
    /// interpreter, not in the program being run.
    #[error("Internal error: {0}")]
    Internal(#[from] BracketError),
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Every byte produced by `.`, in order.
    pub output: Vec<u8>,
    /// The tape as the program left it.
    pub tape: Tape,
    /// Number of recognised instructions executed.
    pub instructions: u64,
    /// Number of input bytes consumed by `,`.
    pub input_consumed: usize,
    /// Wall time spent in the loop. Diagnostic only.
    pub elapsed: Duration,
}

type OutputSink = Box<dyn FnMut(&[u8]) + Send>;

pub struct Interpreter {
    program: Program,
    tape: Tape,
    input: Vec<u8>,
    input_cursor: usize,
    output: Vec<u8>,
    ip: usize,
    instructions: u64,
    output_sink: Option<OutputSink>,
}

impl Interpreter {
    /// Create an interpreter over a fresh zeroed tape.
    pub fn new(program: Program, config: TapeConfig) -> Self {
        Self::with_tape(program, Tape::new(config))
    }

    /// Create an interpreter that starts from an existing tape state.
    pub fn with_tape(program: Program, tape: Tape) -> Self {
        Self {
            program,
            tape,
            input: Vec::new(),
            input_cursor: 0,
            output: Vec::new(),
            ip: 0,
            instructions: 0,
            output_sink: None,
        }
    }

    /// Input consumed by `,`. Empty by default.
    pub fn set_input(&mut self, input: impl Into<Vec<u8>>) {
        self.input = input.into();
        self.input_cursor = 0;
    }

    /// Provide a live output sink. Each `.` passes its encoded bytes to the
    /// sink as soon as it executes; the complete output is still returned in
    /// [`Execution::output`].
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&[u8]) + Send + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Validate, then execute until the instruction pointer runs off the end.
    pub fn run(mut self) -> Result<Execution, RunError> {
        validate(self.program.lines()).into_result()?;
        let jumps = JumpTable::build(self.program.chars())?;

        debug!(
            length = self.program.len(),
            loops = jumps.pairs(),
            cells = self.tape.len(),
            width = %self.tape.cell_width(),
            input_bytes = self.input.len(),
            "starting run"
        );

        let started = Instant::now();
        let code_len = self.program.len();
        while self.ip < code_len {
            if let Some(op) = self.program.op_at(self.ip) {
                self.step(op, &jumps)?;
                self.instructions += 1;
            }
            // A taken jump leaves ip on the partner bracket; this moves past it.
            self.ip += 1;
        }
        let elapsed = started.elapsed();

        info!(
            instructions = self.instructions,
            elapsed_ms = elapsed.as_millis() as u64,
            output_bytes = self.output.len(),
            "run finished"
        );

        Ok(Execution {
            output: self.output,
            tape: self.tape,
            instructions: self.instructions,
            input_consumed: self.input_cursor,
            elapsed,
        })
    }

    fn step(&mut self, op: Op, jumps: &JumpTable) -> Result<(), BracketError> {
        let (ptr_before, cell_before) = (self.tape.pointer(), self.tape.read());

        match op {
            Op::IncrementCell => self.tape.increment_cell(),
            Op::DecrementCell => self.tape.decrement_cell(),
            Op::IncrementPointer => self.tape.increment_pointer(),
            Op::DecrementPointer => self.tape.decrement_pointer(),
            Op::Input => {
                let rest = self.input.get(self.input_cursor..).unwrap_or_default();
                if let Some((value, consumed)) = decode_input(rest, self.tape.cell_width()) {
                    self.tape.write(value);
                    self.input_cursor += consumed;
                }
            }
            Op::Output => self.emit(cell_before),
            Op::LoopStart => {
                if cell_before == 0 {
                    self.ip = self.partner(jumps)?;
                }
            }
            Op::LoopEnd => {
                if cell_before != 0 {
                    self.ip = self.partner(jumps)?;
                }
            }
        }

        trace!(
            step = self.instructions,
            ip = self.ip,
            ptr = ptr_before,
            cell = cell_before,
            after = self.tape.read(),
            op = %op,
            "exec"
        );
        Ok(())
    }

    fn partner(&self, jumps: &JumpTable) -> Result<usize, BracketError> {
        jumps.partner(self.ip).ok_or(BracketError::NotABracket {
            index: self.ip,
            found: self.program.chars().get(self.ip).copied(),
        })
    }

    fn emit(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        let bytes = encode_cell(value, self.tape.cell_width(), &mut buf);
        if let Some(sink) = self.output_sink.as_mut() {
            sink(bytes);
        }
        self.output.extend_from_slice(bytes);
    }
}

/// Encode a cell value as the bytes `.` produces for it.
pub fn encode_cell(value: u32, width: CellWidth, buf: &mut [u8; 4]) -> &[u8] {
    match width {
        CellWidth::Bits8 => {
            buf[0] = value as u8;
            &buf[..1]
        }
        CellWidth::Bits16 | CellWidth::Bits32 => {
            let len = char::from_u32(value)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .encode_utf8(buf)
                .len();
            &buf[..len]
        }
    }
}

/// Decode the value the next `,` reads from `input`, along with the number of
/// bytes it spans. `None` once the input is exhausted.
pub fn decode_input(input: &[u8], width: CellWidth) -> Option<(u32, usize)> {
    match width {
        CellWidth::Bits8 => input.first().map(|&byte| (u32::from(byte), 1)),
        CellWidth::Bits16 | CellWidth::Bits32 => {
            // A scalar is at most four bytes long.
            let head = &input[..input.len().min(4)];
            let chunk = head.utf8_chunks().next()?;
            match chunk.valid().chars().next() {
                Some(c) => Some((u32::from(c), c.len_utf8())),
                None => Some((u32::from(char::REPLACEMENT_CHARACTER), chunk.invalid().len())),
            }
        }
    }
}

/// Run `program` against `input` on a fresh tape shaped by `config`.
pub fn run(program: Program, input: &[u8], config: TapeConfig) -> Result<Execution, RunError> {
    let mut interpreter = Interpreter::new(program, config);
    interpreter.set_input(input);
    interpreter.run()
}

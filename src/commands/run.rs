use clap::Args;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use crate::cli_util::print_run_error;
use crate::commands::{load_source, SourceError};
use crate::config::{self, ConfigLayer};
use crate::{Interpreter, MemoryDump, Program, Tape};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Program file to run
    #[arg(value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Program text given inline instead of a file
    #[arg(short = 'c', long = "code", value_name = "CODE", allow_hyphen_values = true)]
    pub code: Option<String>,

    /// Bytes consumed by ',' ("-" reads stdin until EOF)
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<String>,

    /// Write the complete program output to PATH after the run
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a dump of the final tape to PATH after the run
    #[arg(short = 'm', long = "dump-memory", value_name = "PATH")]
    pub dump_memory: Option<PathBuf>,

    /// Cell width in bits: 8, 16 or 32 (fallback BF_CELL_BITS; default 8)
    #[arg(short = 'b', long = "bits", value_name = "BITS")]
    pub bits: Option<u32>,

    /// Number of tape cells (fallback BF_MEMORY_SIZE; default 30000)
    #[arg(short = 't', long = "tape", value_name = "CELLS")]
    pub tape: Option<usize>,

    /// Do not print the execution summary
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        file,
        code,
        input,
        output,
        dump_memory,
        bits,
        tape,
        quiet,
        ..
    } = args;

    let source = match load_source(file, code) {
        Ok(s) => s,
        Err(SourceError::Missing) => usage_and_exit(program, 2),
        Err(e @ SourceError::Conflicting) => {
            eprintln!("{program}: {e}");
            usage_and_exit(program, 2);
        }
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    // Resolve tape shape: flags -> env -> config file -> defaults
    let config = match config::load(ConfigLayer { cell_bits: bits, memory_size: tape }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{program}: {e}");
            usage_and_exit(program, 2);
        }
    };

    let input_bytes = match read_input(input.as_deref()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{program}: failed to read input: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    // Install SIGINT (ctrl+c) handler so partial output survives an interrupted endless loop
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let tape = match Tape::try_new(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let source = Program::from_source(&source);
    let mut interpreter = Interpreter::with_tape(source.clone(), tape);
    interpreter.set_input(input_bytes);
    interpreter.set_output_sink(|bytes| {
        let _ = io::stdout().lock().write_all(bytes);
    });

    let exec = match interpreter.run() {
        Ok(exec) => exec,
        Err(err) => {
            print_run_error(Some(program), &source, &err);
            return 1;
        }
    };
    let _ = io::stdout().flush();

    if !quiet {
        eprintln!(
            "\n(Executed {} instructions in {} ms)",
            exec.instructions,
            exec.elapsed.as_millis()
        );
    }

    if let Some(path) = output {
        if let Err(e) = fs::write(&path, &exec.output) {
            eprintln!("{program}: could not write the output to {}: {e}", path.display());
            let _ = io::stderr().flush();
            return 1;
        }
    }

    if let Some(path) = dump_memory {
        if let Err(e) = fs::write(&path, MemoryDump::new(&exec.tape).to_string()) {
            eprintln!("{program}: could not write the memory state to {}: {e}", path.display());
            let _ = io::stderr().flush();
            return 1;
        }
    }

    let _ = io::stderr().flush();
    0
}

fn read_input(input: Option<&str>) -> io::Result<Vec<u8>> {
    match input {
        None => Ok(Vec::new()),
        Some("-") => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
        Some(path) => fs::read(path),
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] <PATH>
  {0} run [OPTIONS] --code "<code>"

Options:
  --code,        -c <CODE>   Run CODE instead of a program file
  --input,       -i <PATH>   Bytes consumed by `,` ("-" reads stdin until EOF)
  --output,      -o <PATH>   Also write the complete program output to PATH
  --dump-memory, -m <PATH>   Write a dump of the final tape to PATH
  --bits,        -b <BITS>   Cell width: 8, 16 or 32 (env BF_CELL_BITS; default 8)
  --tape,        -t <CELLS>  Number of tape cells (env BF_MEMORY_SIZE; default 30000)
  --quiet,       -q          Do not print the execution summary
  --help,        -h          Show this help

Notes:
- Program output goes to stdout as it is produced; the summary goes to stderr.
- Cells and the data pointer wrap around; nothing overflows.
- When input is exhausted, `,` leaves the current cell unchanged.
- With 16 or 32-bit cells, `,` reads one UTF-8 character and `.` writes one.
- Characters outside of ><+-.,[] are ignored.
- Tape settings can also be set in the [tape] section of bf.toml in the
  config directory (cell_bits, memory_size).

Examples:
- Run a program file with 16-bit cells:
    {0} run --bits 16 ./program.bf
- Feed a file to `,` and keep a dump of the tape:
    {0} run -i input.txt -m memory.txt ./program.bf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli_util::print_run_error;
use crate::commands::{load_source, SourceError};
use crate::{validate, Program, RunError};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct CheckArgs {
    /// Program file to validate
    #[arg(value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Program text given inline instead of a file
    #[arg(short = 'c', long = "code", value_name = "CODE", allow_hyphen_values = true)]
    pub code: Option<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: CheckArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let source = match load_source(args.file, args.code) {
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

    let source = Program::from_source(&source);
    let result = validate(source.lines());
    match result.into_result() {
        Ok(()) => {
            println!("{result}");
            let _ = io::stdout().flush();
            0
        }
        Err(e) => {
            print_run_error(Some(program), &source, &RunError::Syntax(e));
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} check <PATH>
  {0} check --code "<code>"

Options:
  --code, -c <CODE>  Check CODE instead of a program file
  --help, -h         Show this help

Description:
  Validates that every bracket is matched without running the program.
  Prints "Valid Code" on success; otherwise reports the first offending
  bracket by line and character and exits with status 1.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env_remove("BF_CELL_BITS").env_remove("BF_MEMORY_SIZE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_reversed_brackets_report_first_char() {
    cargo_bin()
        .args(["run", "--code", "+.]["])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Unexpected Closing Bracket at [line: 1 | char: 3]")
                .and(predicate::str::contains("(Executed").not()),
        );
}

#[test]
fn test_unclosed_bracket_on_later_line() {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "+++\n>[-<+>]\n  [[]\n").unwrap();
    cargo_bin()
        .arg("run").arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Unclosed Opening Bracket at [line: 3 | char: 3]")
                .and(predicate::str::contains("3 |   [[]")),
        );
}

#[test]
fn test_missing_program_prints_usage() {
    cargo_bin()
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_file_and_code_conflict() {
    cargo_bin()
        .args(["run", "prog.bf", "--code", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use a program file together with --code"));
}

#[test]
fn test_unreadable_code_file() {
    cargo_bin()
        .args(["run", "/definitely/not/here.bf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read code file"));
}

#[test]
fn test_unreadable_input_file() {
    cargo_bin()
        .args(["run", "--code", ",.", "--input", "/definitely/not/here.txt"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to read input"));
}

#[test]
fn test_unsupported_bits() {
    cargo_bin()
        .args(["run", "--bits", "12", "--code", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("only 8, 16 and 32 bits available"));
}

#[test]
fn test_zero_tape() {
    cargo_bin()
        .args(["run", "--tape", "0", "--code", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("memory size must be a positive integer"));
}

#[test]
fn test_tape_too_large_to_allocate() {
    let cells = usize::MAX.to_string();
    cargo_bin()
        .args(["run", "--tape", &cells, "--code", "+."])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot allocate a tape of"));
}

#[test]
fn test_invalid_env_value() {
    cargo_bin()
        .env("BF_MEMORY_SIZE", "lots")
        .args(["run", "--code", "+"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value for BF_MEMORY_SIZE"));
}

#[test]
fn test_unwritable_output_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory cannot be written as a file.
    cargo_bin()
        .args(["run", "-q", "--code", "+."])
        .arg("--output").arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not write the output"));
}

// --output and --dump-memory persist the run after it finishes.
use assert_cmd::Command;
use std::fs;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env_remove("BF_CELL_BITS").env_remove("BF_MEMORY_SIZE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn output_file_matches_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.txt");

    let assert = cargo_bin()
        .args(["run", "-q", "--code", "++++++++[>++++++++<-]>+.+.+."])
        .arg("--output").arg(&out)
        .assert()
        .success()
        .stdout("ABC");

    assert_eq!(fs::read(&out).unwrap(), assert.get_output().stdout);
}

#[test]
fn dump_memory_renders_final_tape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.txt");
    let dump = dir.path().join("dump.txt");
    fs::write(&input, "Hi").unwrap();

    cargo_bin()
        .args(["run", "-q", "--tape", "24", "--code", ",>,"])
        .arg("--input").arg(&input)
        .arg("--dump-memory").arg(&dump)
        .assert()
        .success();

    let rendered = fs::read_to_string(&dump).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "00: 072 105 000 000 000 000 000 000 000 000 000 000 Hi.........."
    );
    assert!(lines[1].starts_with("12: 000 000 "));
}

#[test]
fn dump_memory_uses_eight_cells_per_row_for_16_bit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dump = dir.path().join("dump.txt");

    cargo_bin()
        .args(["run", "-q", "--bits", "16", "--tape", "16", "--code", "-"])
        .arg("--dump-memory").arg(&dump)
        .assert()
        .success();

    let rendered = fs::read_to_string(&dump).unwrap();
    let first = rendered.lines().next().unwrap();
    assert_eq!(first, format!("00: 65535 {}........", "00000 ".repeat(7)));
    assert_eq!(rendered.lines().count(), 2);
}

#[test]
fn no_files_written_on_syntax_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.txt");
    let dump = dir.path().join("dump.txt");

    cargo_bin()
        .args(["run", "--code", "+.["])
        .arg("--output").arg(&out)
        .arg("--dump-memory").arg(&dump)
        .assert()
        .code(1);

    assert!(!out.exists());
    assert!(!dump.exists());
}

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn pyml(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pyml"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start pyml")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const PROGRAM: &str = "\
packages:
  - math
total: 2 + 3
for i in range.2:
  print: \"{i} of {total}\"
";

#[test]
fn show_transpiled() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", PROGRAM);
    let output = pyml(&["run", "prog.pyml", "--tr"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "import math\n\ntotal = 5\nfor i in range(2):\n    print(f\"{i} of {total}\")\n"
    );
}

#[test]
fn bare_file_argument_means_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", PROGRAM);
    let output = pyml(&["--no-color", "prog.pyml", "--tr"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("import math\n"));
}

#[test]
fn global_flags_change_stages() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", PROGRAM);
    let output = pyml(&["--no-fold", "--unroll", "run", "prog.pyml", "--tr"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "import math\n\ntotal = 2 + 3\ni = 0\nprint(f\"{i} of {total}\")\ni = 1\nprint(f\"{i} of {total}\")\n"
    );
}

#[test]
fn config_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", PROGRAM);
    write(
        dir.path(),
        "pyml.toml",
        "[transpile]\nconstant_folding = false\n\n[runner]\ninterpreter = \"cat\"\n",
    );
    let output = pyml(&["run", "prog.pyml", "--tr"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("total = 2 + 3\n"));

    // An explicit --config replaces ./pyml.toml.
    let explicit = write(dir.path(), "other.toml", "[transpile]\nloop_unrolling = true\n");
    let output = pyml(
        &["--config", explicit.to_str().unwrap(), "prog.pyml", "--tr"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("total = 5\ni = 0\n"));
}

#[test]
fn invalid_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", PROGRAM);
    write(dir.path(), "pyml.toml", "[transpile]\nfold_everything = true\n");
    let output = pyml(&["run", "prog.pyml", "--tr"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid config"));
}

#[test]
fn transpile_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", "x: 6 * 7\nprint: x\n");
    let output = pyml(&["transpile", "prog.pyml", "-o", "prog.py"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("prog.py")).unwrap(),
        "x = 42\nprint(x)\n"
    );
}

#[test]
fn check_reports_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.pyml", "x: 1\n");
    write(dir.path(), "bad.pyml", "x:\nfor y in 3:\n");

    let output = pyml(&["--no-color", "run", "good.pyml", "--check"], dir.path());
    assert!(output.status.success());
    assert!(stderr(&output).contains("ok: good.pyml"));

    let output = pyml(&["--no-color", "run", "bad.pyml", "--check"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("has no value"), "{}", err);
    assert!(err.contains("malformed for loop"), "{}", err);
    assert!(err.contains("bad.pyml:2:1"), "{}", err);
}

#[test]
fn lines_dump() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", "x: 1\nif x:\n  go;\n");
    let output = pyml(&["run", "prog.pyml", "--lines"], dir.path());
    assert!(output.status.success());
    let out = stdout(&output);
    let rows: Vec<&str> = out.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("Assignment"));
    assert!(rows[1].contains("Control"));
    assert!(rows[2].contains("BareCall") && rows[2].contains("go;"));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = pyml(&["run", "nope.pyml"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot read 'nope.pyml'"));
}

#[test]
fn missing_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.pyml", "print: 1\n");
    let output = pyml(
        &["--interpreter", "pyml-test-no-such-interpreter", "prog.pyml"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("interpreter not found"));
}

#[cfg(unix)]
#[test]
fn run_forwards_output_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    // `sh` stands in for Python: unrecognised lines pass through verbatim.
    write(dir.path(), "prog.pyml", "echo \"hello $1\"\nexit 4\n");
    let output = pyml(
        &["--interpreter", "sh", "run", "prog.pyml", "--", "world"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stdout(&output), "hello world\n");

    let output = pyml(
        &["--interpreter", "sh", "run", "prog.pyml", "-q", "--", "world"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stdout(&output), "");
}

#[cfg(unix)]
#[test]
fn program_runs_beside_its_source() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("app");
    std::fs::create_dir(&sub).unwrap();
    write(&sub, "helper.txt", "hi from helper\n");
    write(&sub, "prog.pyml", "cat \"$(dirname \"$0\")/helper.txt\"\n");

    let output = pyml(&["--interpreter", "sh", "run", "app/prog.pyml"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "hi from helper\n");
    let leftovers: Vec<_> = std::fs::read_dir(&sub).unwrap().collect();
    assert_eq!(leftovers.len(), 2);
}

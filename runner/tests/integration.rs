use std::path::Path;

use runner::{DEFAULT_INTERPRETER, RunError, Runner};

#[test]
fn command_line_layout() {
    let mut runner = Runner::new("python3");
    runner.args = vec!["-u".to_string()];
    runner.optimize_flag = true;
    runner.script_args = vec!["one".to_string(), "two".to_string()];
    assert_eq!(
        runner.command_args(Path::new("script.py")),
        vec!["-u", "-O", "script.py", "one", "two"]
    );
}

#[test]
fn default_interpreter() {
    assert_eq!(Runner::default().interpreter, DEFAULT_INTERPRETER);
    assert!(!Runner::default().optimize_flag);
}

#[test]
fn missing_interpreter() {
    let runner = Runner::new("pyml-test-no-such-interpreter");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = runner.run("print(1)\n", "missing", &mut out, &mut err);
    assert!(matches!(result, Err(RunError::InterpreterNotFound(name)) if name == "pyml-test-no-such-interpreter"));
}

#[cfg(unix)]
#[test]
fn script_reaches_the_interpreter() {
    // `cat` echoes the script back, which shows exactly what was written.
    let code = pyml::transpile("x: 2 * 21\nprint: x\n");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = Runner::new("cat")
        .run(&code, "echo", &mut out, &mut err)
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "x = 42\nprint(x)\n");
    assert!(err.is_empty());

    let name = outcome.script_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("_pyml_temp_echo"), "{}", name);
    assert!(name.ends_with(".py"), "{}", name);
    assert!(!outcome.script_path.exists());
}

#[cfg(unix)]
#[test]
fn exit_code_is_forwarded() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = Runner::new("false")
        .run("", "fails", &mut out, &mut err)
        .unwrap();
    assert_eq!(outcome.exit_code, 1);
    assert!(!outcome.script_path.exists());
}

#[cfg(unix)]
#[test]
fn stderr_is_copied() {
    let mut runner = Runner::new("sh");
    runner.script_args = vec!["arg".to_string()];
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = runner
        .run("echo \"got $1\"\necho oops >&2\nexit 3\n", "shell", &mut out, &mut err)
        .unwrap();
    assert_eq!(outcome.exit_code, 3);
    assert_eq!(String::from_utf8(out).unwrap(), "got arg\n");
    assert_eq!(String::from_utf8(err).unwrap(), "oops\n");
}

#[test]
fn scripts_are_placed_beside_the_source() {
    let mut runner = Runner::default();
    assert_eq!(runner.script_dir, None);
    runner.place_beside(Path::new("prog.pyml"));
    assert_eq!(runner.script_dir.as_deref(), Some(Path::new(".")));
    runner.place_beside(Path::new("src/app/prog.pyml"));
    assert_eq!(runner.script_dir.as_deref(), Some(Path::new("src/app")));
}

#[cfg(unix)]
#[test]
fn sibling_files_are_reachable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("helper.txt"), "hi from helper\n").unwrap();

    let mut runner = Runner::new("sh");
    runner.place_beside(&dir.path().join("main.pyml"));
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = runner
        .run("cat \"$(dirname \"$0\")/helper.txt\"\n", "main", &mut out, &mut err)
        .unwrap();

    assert_eq!(outcome.exit_code, 0, "{}", String::from_utf8_lossy(&err));
    assert_eq!(String::from_utf8(out).unwrap(), "hi from helper\n");
    assert_eq!(outcome.script_path.parent(), Some(dir.path()));
    assert!(!outcome.script_path.exists());
}

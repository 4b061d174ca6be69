use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::Builder;

use crate::error::RunError;

/// Environment variable naming the interpreter to use.
pub const INTERPRETER_ENV: &str = "PYML_PYTHON";

pub const DEFAULT_INTERPRETER: &str = "python3";

/// Executes generated Python through an external interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct Runner {
    /// Interpreter command, looked up on `PATH`.
    pub interpreter: String,
    /// Extra interpreter arguments placed before the script path.
    pub args: Vec<String>,
    /// Pass `-O` to the interpreter.
    pub optimize_flag: bool,
    /// Arguments handed to the script itself.
    pub script_args: Vec<String>,
    /// Directory the script is written to. Python puts it first on
    /// `sys.path`, so modules next to the program can be imported.
    /// `None` uses the system temporary directory.
    pub script_dir: Option<PathBuf>,
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub exit_code: i32,
    /// Where the script was written. The file no longer exists.
    pub script_path: PathBuf,
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new(DEFAULT_INTERPRETER)
    }
}

impl Runner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Runner {
            interpreter: interpreter.into(),
            args: Vec::new(),
            optimize_flag: false,
            script_args: Vec::new(),
            script_dir: None,
        }
    }

    /// Use `$PYML_PYTHON` when set and non-empty, otherwise `python3`.
    pub fn from_env() -> Self {
        match env::var(INTERPRETER_ENV) {
            Ok(name) if !name.trim().is_empty() => Runner::new(name.trim()),
            _ => Runner::default(),
        }
    }

    /// Full argument list passed to the interpreter for `script`.
    pub fn command_args(&self, script: &Path) -> Vec<String> {
        let mut args = self.args.clone();
        if self.optimize_flag {
            args.push("-O".to_string());
        }
        args.push(script.display().to_string());
        args.extend(self.script_args.iter().cloned());
        args
    }

    /// Write scripts next to `source`, so its sibling modules are importable.
    pub fn place_beside(&mut self, source: &Path) {
        let dir = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.script_dir = Some(dir);
    }

    /// Write `code` to a temporary `_pyml_temp_<stem>*.py` in `script_dir`, run
    /// it and copy the child's output to `stdout` and `stderr`.
    ///
    /// The temporary file is removed before returning, whether or not the run
    /// succeeded.
    pub fn run(
        &self,
        code: &str,
        stem: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<RunOutcome, RunError> {
        let prefix = format!("_pyml_temp_{}", stem);
        let mut builder = Builder::new();
        builder.prefix(&prefix).suffix(".py");
        let mut script = match &self.script_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        script.write_all(code.as_bytes())?;
        script.flush()?;
        let script_path = script.path().to_path_buf();

        let args = self.command_args(&script_path);
        log::info!("running {} {}", self.interpreter, args.join(" "));

        let output = Command::new(&self.interpreter)
            .args(&args)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RunError::InterpreterNotFound(self.interpreter.clone()),
                _ => RunError::Spawn {
                    interpreter: self.interpreter.clone(),
                    source: e,
                },
            })?;

        stdout.write_all(&output.stdout)?;
        stderr.write_all(&output.stderr)?;
        script.close()?;

        let exit_code = output.status.code().ok_or(RunError::Terminated)?;
        log::debug!("{} exited with {}", self.interpreter, exit_code);
        Ok(RunOutcome {
            exit_code,
            script_path,
        })
    }
}

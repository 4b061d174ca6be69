use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RunError {
    /// The interpreter command could not be found on `PATH`.
    InterpreterNotFound(String),
    /// The interpreter exists but could not be started.
    Spawn { interpreter: String, source: io::Error },
    /// Writing the script or copying the child's output failed.
    Io(io::Error),
    /// The child was killed by a signal and has no exit code.
    Terminated,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InterpreterNotFound(name) => {
                write!(f, "interpreter not found: {}", name)
            }
            RunError::Spawn {
                interpreter,
                source,
            } => write!(f, "failed to start {}: {}", interpreter, source),
            RunError::Io(e) => write!(f, "I/O error: {}", e),
            RunError::Terminated => write!(f, "interpreter terminated by a signal"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Spawn { source, .. } => Some(source),
            RunError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        RunError::Io(e)
    }
}

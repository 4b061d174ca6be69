use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use pyml::Options;
use runner::Runner;

/// Looked up in the current directory when `--config` is not given.
pub const CONFIG_FILE: &str = "pyml.toml";

/// Contents of `pyml.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub transpile: TranspileConfig,
    pub runner: RunnerConfig,
}

/// Stage toggles; unset keys keep the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranspileConfig {
    pub constant_folding: Option<bool>,
    pub string_interpolation: Option<bool>,
    pub loop_unrolling: Option<bool>,
    pub max_unroll: Option<usize>,
    pub import_cache: Option<bool>,
    pub parallel_classification: Option<bool>,
    pub preserve_comments: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub interpreter: Option<String>,
    pub args: Vec<String>,
    pub optimize: Option<bool>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load `explicit`, or `pyml.toml` from the current directory if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Config::default());
                }
                default
            }
        };
        log::debug!("loading config from {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Config::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply(&self, options: &mut Options) {
        self.transpile.apply(options);
    }

    /// Runner settings from the file, with `PYML_PYTHON` as the fallback interpreter.
    pub fn runner(&self) -> Runner {
        let mut runner = match &self.runner.interpreter {
            Some(interpreter) => Runner::new(interpreter.as_str()),
            None => Runner::from_env(),
        };
        runner.args = self.runner.args.clone();
        runner.optimize_flag = self.runner.optimize.unwrap_or(false);
        runner
    }
}

impl TranspileConfig {
    /// Overwrite every option that is set here.
    pub fn apply(&self, options: &mut Options) {
        let TranspileConfig {
            constant_folding,
            string_interpolation,
            loop_unrolling,
            max_unroll,
            import_cache,
            parallel_classification,
            preserve_comments,
        } = *self;

        if let Some(v) = constant_folding {
            options.constant_folding = v;
        }
        if let Some(v) = string_interpolation {
            options.string_interpolation = v;
        }
        if let Some(v) = loop_unrolling {
            options.loop_unrolling = v;
        }
        if let Some(v) = max_unroll {
            options.max_unroll = v;
        }
        if let Some(v) = import_cache {
            options.import_cache = v;
        }
        if let Some(v) = parallel_classification {
            options.parallel_classification = v;
        }
        if let Some(v) = preserve_comments {
            options.preserve_comments = v;
        }
    }
}

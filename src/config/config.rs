use std::{env, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::Level;

use crate::interpreter::interpreter::InterpreterConfig;

pub const STRICT_LABELS_ENV: &str = "PLC_STRICT_LABELS";
pub const LOG_ENV: &str = "PLC_LOG";
pub const DEFAULT_OUTPUT: &str = "output.asm";

pub const USAGE: &str = "usage: plc <source> [-o <out.asm>] [--no-run] [--strict-labels] [-v|-vv]\n       plc --run <file.asm> [--strict-labels] [-v|-vv]";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no input file given")]
    MissingSource,
    #[error("option '{flag}' expects a value")]
    MissingValue { flag: String },
    #[error("unknown option '{flag}'")]
    UnknownFlag { flag: String },
    #[error("unexpected argument '{argument}'")]
    UnexpectedArgument { argument: String },
    #[error("'{flag}' cannot be used together with --run")]
    ConflictingFlag { flag: String },
    #[error("invalid log level '{value}' in {LOG_ENV}")]
    InvalidLogLevel { value: String },
    #[error("help requested")]
    HelpRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Program source, or the bytecode file when `run_only` is set.
    pub source: PathBuf,
    pub output: PathBuf,
    pub run_only: bool,
    pub no_run: bool,
    pub strict_labels: bool,
    pub verbosity: u8,
    pub log_override: Option<Level>,
}

impl Config {
    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::parse(env::args().skip(1), |name| env::var(name).ok())
    }

    /// Parses arguments (without the program name). `lookup` resolves
    /// environment variables.
    pub fn parse<I, F>(args: I, lookup: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();

        let mut source = None;
        let mut output = None;
        let mut run_only = false;
        let mut no_run = false;
        let mut strict_labels = false;
        let mut verbosity = 0;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "-o" | "--output" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue { flag: arg.clone() })?;
                    output = Some(PathBuf::from(value));
                }
                "--run" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue { flag: arg.clone() })?;
                    if source.is_some() {
                        return Err(ConfigError::UnexpectedArgument { argument: value });
                    }
                    source = Some(PathBuf::from(value));
                    run_only = true;
                }
                "--no-run" => no_run = true,
                "--strict-labels" => strict_labels = true,
                "-v" => verbosity += 1,
                "-vv" => verbosity += 2,
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(ConfigError::UnknownFlag { flag: flag.to_string() });
                }
                path => {
                    if source.is_some() {
                        return Err(ConfigError::UnexpectedArgument { argument: path.to_string() });
                    }
                    source = Some(PathBuf::from(path));
                }
            }
        }

        let source = source.ok_or(ConfigError::MissingSource)?;

        if run_only {
            if output.is_some() {
                return Err(ConfigError::ConflictingFlag { flag: String::from("-o") });
            }
            if no_run {
                return Err(ConfigError::ConflictingFlag { flag: String::from("--no-run") });
            }
        }

        if !strict_labels {
            strict_labels = lookup(STRICT_LABELS_ENV).is_some_and(|value| is_enabled(&value));
        }

        let log_override = match lookup(LOG_ENV) {
            Some(value) if !value.trim().is_empty() => Some(
                Level::from_str(value.trim()).map_err(|_| ConfigError::InvalidLogLevel { value })?,
            ),
            _ => None,
        };

        Ok(Config {
            source,
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            run_only,
            no_run,
            strict_labels,
            verbosity,
            log_override,
        })
    }

    /// Maximum level for diagnostics on stderr. `PLC_LOG` wins over `-v`.
    pub fn log_level(&self) -> Level {
        if let Some(level) = self.log_override {
            return level;
        }

        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            strict_labels: self.strict_labels,
        }
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

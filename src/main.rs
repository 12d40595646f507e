use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use anyhow::Context;
use plc::{
    bytecode::instruction::{parse_program, serialize},
    compile_source,
    config::config::{Config, ConfigError, USAGE},
    interpreter::interpreter::Interpreter,
    render_error,
};
use tracing::info;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("Error: {}\n{}", error, USAGE);
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level())
        .with_target(false)
        .init();

    match run(&config) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<ExitCode> {
    if config.run_only {
        interpret(config, &config.source)?;
        return Ok(ExitCode::SUCCESS);
    }

    let source = fs::read_to_string(&config.source)
        .with_context(|| format!("reading {}", config.source.display()))?;
    let file_name = config
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.source.display().to_string());

    let instructions = match compile_source(&source, &file_name) {
        Ok(instructions) => instructions,
        Err(failure) => {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{} {} error(s) in {}:", failure.errors.len(), failure.phase, file_name)?;
            for (index, error) in failure.errors.iter().enumerate() {
                write!(stderr, "{}. {}", index + 1, render_error(error, &source))?;
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    fs::write(&config.output, serialize(&instructions))
        .with_context(|| format!("writing {}", config.output.display()))?;
    info!(output = %config.output.display(), instructions = instructions.len(), "bytecode written");

    if !config.no_run {
        interpret(config, &config.output)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads a bytecode file and runs it on the console.
fn interpret(config: &Config, path: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let instructions = parse_program(&text);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(stdin.lock(), stdout.lock(), config.interpreter_config());

    interpreter
        .run(&instructions)
        .with_context(|| format!("running {}", path.display()))
}

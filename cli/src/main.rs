mod config;
mod test_runner;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use pyml::{Diagnostic, Options, Transpiled, Transpiler};
use runner::{INTERPRETER_ENV, RunError, Runner};

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["run", "transpile", "test", "help"];

/// Global options that consume the following argument.
const VALUE_OPTIONS: &[&str] = &["--config", "--interpreter"];

#[derive(Parser)]
#[command(name = "pyml", version, about = "PyML to Python transpiler")]
struct Cli {
    /// Disable colored diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (defaults to ./pyml.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Python interpreter used to run programs
    #[arg(long, global = true, value_name = "CMD")]
    interpreter: Option<String>,

    /// Disable constant folding
    #[arg(long, global = true)]
    no_fold: bool,

    /// Disable rewriting string concatenation into f-strings
    #[arg(long, global = true)]
    no_interpolate: bool,

    /// Unroll short literal range loops
    #[arg(long, global = true)]
    unroll: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transpile a PyML program and run it
    Run(RunArgs),

    /// Transpile a PyML program and write the Python source
    Transpile(TranspileArgs),

    /// Run .test.pyml golden files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// PyML source file
    file: String,

    /// Print the transpiled Python instead of running it
    #[arg(long = "tr")]
    show_transpiled: bool,

    /// Transpile only and report diagnostics (exit 0 if there are no warnings)
    #[arg(long)]
    check: bool,

    /// Dump the classified source lines
    #[arg(long)]
    lines: bool,

    /// Suppress the program's output
    #[arg(short, long)]
    quiet: bool,

    /// Arguments passed to the program (after --)
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(clap::Args)]
struct TranspileArgs {
    /// PyML source file
    file: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.pyml file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

/// Backwards compatibility: if the first positional arg is not a known
/// subcommand, inject "run" so `pyml file.pyml` works like `pyml run file.pyml`.
fn inject_run(mut args: Vec<String>) -> Vec<String> {
    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            i += 2;
            continue;
        }
        if arg == "--" {
            break;
        }
        if !arg.starts_with('-') {
            if !SUBCOMMANDS.contains(&arg.as_str()) {
                args.insert(i, "run".to_string());
            }
            break;
        }
        i += 1;
    }
    args
}

fn main() {
    let cli = Cli::parse_from(inject_run(std::env::args().collect()));
    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let options = cli.options(&config);
    let runner = cli.runner(&config);

    match &cli.command {
        Command::Run(run_args) => do_run(run_args, &options, &runner, cli.no_color),
        Command::Transpile(args) => do_transpile(args, &options, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let harness = test_runner::Harness {
                options: &options,
                runner: &runner,
            };
            let exit_code =
                test_runner::run_tests(path, &harness, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

impl Cli {
    /// Built-in defaults, then the config file, then command-line flags.
    fn options(&self, config: &Config) -> Options {
        let mut options = Options::default();
        config.apply(&mut options);
        if self.no_fold {
            options.constant_folding = false;
        }
        if self.no_interpolate {
            options.string_interpolation = false;
        }
        if self.unroll {
            options.loop_unrolling = true;
        }
        options
    }

    fn runner(&self, config: &Config) -> Runner {
        let mut runner = config.runner();
        if let Some(interpreter) = &self.interpreter {
            runner.interpreter = interpreter.clone();
        }
        runner
    }
}

/// A source file registered with the codespan file database.
struct Loaded {
    files: SimpleFiles<String, String>,
    file_id: usize,
    source: String,
}

fn load(file: &str) -> Loaded {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };
    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());
    Loaded {
        files,
        file_id,
        source,
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn emit_diagnostics(files: &SimpleFiles<String, String>, diagnostics: &[Diagnostic], no_color: bool) {
    let writer = StandardStream::stderr(color_choice(no_color));
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let report = diagnostic.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &report);
    }
}

/// Transpile `file` and render its diagnostics to stderr.
fn transpile_file(file: &str, options: &Options, no_color: bool) -> Transpiled {
    let loaded = load(file);
    let result = Transpiler::new(options.clone()).transpile(&loaded.source, loaded.file_id);
    emit_diagnostics(&loaded.files, &result.diagnostics, no_color);
    result
}

fn do_run(args: &RunArgs, options: &Options, runner: &Runner, no_color: bool) {
    if args.lines {
        let loaded = load(&args.file);
        for line in Transpiler::new(options.clone()).prepare(&loaded.source) {
            println!(
                "{:>4} {:>2} {:<13} {}",
                line.number,
                line.level(),
                format!("{:?}", line.kind),
                line.text
            );
        }
        return;
    }

    let result = transpile_file(&args.file, options, no_color);

    // --check: transpile only; warnings fail the check
    if args.check {
        let warnings = result.warnings().count();
        if warnings > 0 {
            eprintln!("{}: {} warning(s)", args.file, warnings);
            process::exit(1);
        }
        eprintln!("ok: {} transpiled cleanly", args.file);
        return;
    }

    // --tr: show the generated code
    if args.show_transpiled {
        print!("{}", result.code);
        return;
    }

    let stem = Path::new(&args.file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("main");
    let mut runner = runner.clone();
    runner.script_args = args.args.clone();
    runner.place_beside(Path::new(&args.file));

    let mut stdout = std::io::stdout();
    let mut sink = std::io::sink();
    let out: &mut dyn Write = if args.quiet { &mut sink } else { &mut stdout };
    let mut stderr = std::io::stderr();

    match runner.run(&result.code, stem, out, &mut stderr) {
        Ok(outcome) => {
            let _ = out.flush();
            process::exit(outcome.exit_code);
        }
        Err(e @ RunError::InterpreterNotFound(_)) => {
            eprintln!("error: {} (set --interpreter or ${})", e, INTERPRETER_ENV);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn do_transpile(args: &TranspileArgs, options: &Options, no_color: bool) {
    let result = transpile_file(&args.file, options, no_color);
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &result.code) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", result.code),
    }
}

// microc: Micro-C interpreter with a step-through trace viewer

use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use microc::interpreter::constants::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_SNAPSHOT_LIMIT};
use microc::interpreter::{InputSource, Interpreter, QueueInput, ReaderInput, RunConfig};
use microc::parser::printer::print_program;
use microc::ui::App;
use microc::{Compiled, Error};

#[derive(Debug, Parser)]
#[command(author, version, about = "Micro-C interpreter")]
struct Cli {
    /// Narrate pipeline stages on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile and run a program
    Run {
        file: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check a program without running it
    Check { file: PathBuf },
    /// Print a program in canonical form
    Fmt { file: PathBuf },
    /// Run a program with snapshots, then step through it
    View {
        file: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Read input tokens from a file instead of stdin
    #[arg(long, conflicts_with = "values")]
    input: Option<PathBuf>,

    /// Input tokens given inline, e.g. --values "3 true 7"
    #[arg(long)]
    values: Option<String>,

    /// Separator written between output values
    #[arg(long, default_value = "\n")]
    delimiter: String,

    /// Maximum call depth
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Maximum number of recorded steps (view only)
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
    max_steps: usize,
}

impl RunArgs {
    fn input_source(&self) -> Result<Box<dyn InputSource>, Error> {
        if let Some(values) = &self.values {
            return Ok(Box::new(QueueInput::from_text(values)));
        }
        if let Some(path) = &self.input {
            let file = fs::File::open(path)?;
            return Ok(Box::new(ReaderInput::new(BufReader::new(file))));
        }
        Ok(Box::new(ReaderInput::new(BufReader::new(io::stdin()))))
    }

    fn config(&self, record_snapshots: bool) -> RunConfig {
        RunConfig {
            max_call_depth: self.max_depth,
            record_snapshots,
            snapshot_limit: self.max_steps,
        }
    }
}

/// Stage narration, shown only with `--verbose`
struct Log {
    verbose: bool,
}

impl Log {
    fn stage(&self, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("{}", message.as_ref());
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = Log {
        verbose: cli.verbose,
    };

    let (file, result) = match &cli.command {
        Command::Run { file, run } => (file, run_program(file, run, &log)),
        Command::Check { file } => (file, check_program(file, &log)),
        Command::Fmt { file } => (file, format_program(file, &log)),
        Command::View { file, run } => (file, view_program(file, run, &log)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.diagnostic(&file.display().to_string()));
            ExitCode::from(err.kind().exit_code() as u8)
        }
    }
}

fn load(file: &Path, log: &Log) -> Result<Compiled, Error> {
    let source = fs::read_to_string(file)?;
    log.stage(format!("Parsing {}...", file.display()));
    let compiled = microc::compile(&source)?;
    log.stage(format!(
        "Checked {} function(s) and {} global(s)",
        compiled.program.functions.len(),
        compiled.program.globals.len()
    ));
    Ok(compiled)
}

fn run_program(file: &Path, args: &RunArgs, log: &Log) -> Result<(), Error> {
    let compiled = load(file, log)?;
    let input = args.input_source()?;

    log.stage("Executing program...");
    let mut interpreter = Interpreter::new(Arc::new(compiled), input, args.config(false))
        .with_echo(Box::new(io::stdout()), args.delimiter.clone());
    let result = interpreter.run();

    if !interpreter.output().is_empty() {
        let mut stdout = io::stdout();
        writeln!(stdout)?;
        stdout.flush()?;
    }
    result?;
    log.stage(format!(
        "Execution completed, {} value(s) written",
        interpreter.output().len()
    ));
    Ok(())
}

fn check_program(file: &Path, log: &Log) -> Result<(), Error> {
    load(file, log)?;
    println!("Program OK");
    Ok(())
}

fn format_program(file: &Path, log: &Log) -> Result<(), Error> {
    let source = fs::read_to_string(file)?;
    log.stage(format!("Parsing {}...", file.display()));
    let program = microc::parse(&source)?;
    print!("{}", print_program(&program));
    Ok(())
}

fn view_program(file: &Path, args: &RunArgs, log: &Log) -> Result<(), Error> {
    let compiled = load(file, log)?;
    let input = args.input_source()?;

    log.stage("Executing program...");
    let mut interpreter = Interpreter::new(Arc::new(compiled), input, args.config(true));
    match interpreter.run() {
        Ok(()) => log.stage(format!(
            "Execution completed. Total snapshots: {}",
            interpreter.snapshots().len()
        )),
        Err(err) => log.stage(format!("Runtime error: {}", err)),
    }
    if interpreter.snapshots().is_truncated() {
        log.stage(format!(
            "History truncated after {} steps",
            interpreter.snapshots().limit()
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

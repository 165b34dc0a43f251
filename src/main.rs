use std::io::{self, prelude::*, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use console::style;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use structopt::StructOpt;

mod error;
mod format;
mod help;
mod interpreter;
mod persist;

use interpreter::{Interpreter, Stack};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rpn",
    about = "A console RPN calculator with a stack that persists between sessions."
)]
struct Opt {
    /// Enables debug log level
    #[structopt(short = "D", long)]
    debug: bool,

    /// Enables trace log level
    #[structopt(short, long)]
    trace: bool,

    /// Enables info log level
    #[structopt(short, long)]
    info: bool,

    /// The file the stack is restored from and saved to on exit
    #[structopt(long, parse(from_os_str))]
    stack_file: Option<PathBuf>,

    /// Start with an empty stack and don't save it on exit
    #[structopt(long)]
    no_save: bool,
}

fn log_environment(opt: &Opt, stack_file: &Path) {
    debug!("System Information:");
    debug!("  - version:    {}", env!("CARGO_PKG_VERSION"));
    debug!("  - os:         {}", std::env::consts::OS);
    debug!("  - arch:       {}", std::env::consts::ARCH);
    if let Ok(dir) = std::env::current_dir() {
        debug!("  - dir:        {}", dir.display());
    }
    debug!("  - stack file: {}", stack_file.display());
    debug!("Command Line Options: {:?}", opt);
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let log_level = if opt.trace {
        log::Level::Trace
    } else if opt.debug {
        log::Level::Debug
    } else if opt.info {
        log::Level::Info
    } else {
        log::Level::Warn
    };

    simple_logger::init_with_level(log_level)?;

    println!("{}", style(help::banner()).bold());

    if !io::stdin().is_terminal() {
        eprintln!(
            "{}",
            style("FATAL ERROR: Could not initialize OS console for data input").red()
        );
        bail!("standard input is not an interactive console");
    }

    let stack_file = opt.stack_file.clone().unwrap_or_else(persist::default_path);
    log_environment(&opt, &stack_file);

    let stack = if opt.no_save {
        Stack::default()
    } else {
        persist::load(&stack_file)
    };

    let mut interpreter = Interpreter::new(stack);
    let stack_file = (!opt.no_save).then_some(stack_file);

    run_and_save(
        &mut interpreter,
        io::stdin().lock(),
        io::stdout(),
        stack_file.as_deref(),
    )
}

/// Run the session, then save the primary stack even if the loop stopped on
/// an I/O error.
fn run_and_save<R: BufRead, W: Write>(
    interpreter: &mut Interpreter,
    input: R,
    output: W,
    stack_file: Option<&Path>,
) -> anyhow::Result<()> {
    let result = interpreter.run(input, output);

    if let Err(e) = &result {
        error!("session ended early: {:#}", e);
    }

    if let Some(path) = stack_file {
        persist::save(path, interpreter.primary())
            .with_context(|| format!("Failed to save the stack to {}", path.display()))?;
    }

    result
}

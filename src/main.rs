use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use rust_sqlite::{Control, Session, TABLE_MAX_PAGES, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// In-memory single-table database shell
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Maximum number of pages the table may allocate
    #[arg(
        long,
        default_value_t = TABLE_MAX_PAGES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_pages: usize,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

struct InputBuffer {
    raw: Vec<u8>,
    buffer: String,
}

impl InputBuffer {
    fn new() -> Self {
        Self {
            raw: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Reads one line as raw bytes; invalid UTF-8 is replaced rather than rejected.
    fn read_input(&mut self, input: &mut impl BufRead) -> Result<()> {
        self.raw.clear();
        let read = input
            .read_until(b'\n', &mut self.raw)
            .context("Error reading input")?;
        if read == 0 {
            bail!("Error reading input: end of input");
        }
        self.buffer = String::from_utf8_lossy(&self.raw).trim().to_string();
        Ok(())
    }
}

fn print_prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "db > ")?;
    out.flush()
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("rust_sqlite=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut session = Session::new(Table::with_max_pages(args.max_pages));
    let mut input_buffer = InputBuffer::new();
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    loop {
        print_prompt(&mut stdout)?;
        input_buffer.read_input(&mut stdin)?;

        match session.handle_line(&input_buffer.buffer, &mut stdout)? {
            Control::Continue => {}
            Control::Exit => break,
        }
    }

    stdout.flush()?;
    debug!("session closed");
    Ok(())
}

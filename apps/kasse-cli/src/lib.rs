//! # Kasse CLI Library
//!
//! Process bootstrap and the line-oriented command loop for the Kasse
//! point-of-sale ledger.
//!
//! ## Module Organization
//! ```text
//! kasse_cli_lib/
//! ├── lib.rs          ◄─── You are here (startup & loop)
//! ├── config.rs       ◄─── AppConfig (defaults → TOML → env)
//! ├── error.rs        ◄─── CliError for command handlers
//! ├── state/
//! │   ├── mod.rs      ◄─── State exports
//! │   └── session.rs  ◄─── Catalog + register + renderer, file loading
//! └── commands/
//!     ├── mod.rs      ◄─── Parsing and dispatch
//!     ├── catalog.rs  ◄─── Product and discount commands
//!     ├── receipt.rs  ◄─── Basket commands
//!     └── print.rs    ◄─── Output commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use kasse_core::ReceiptStyle;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use commands::Reply;
use config::AppConfig;
use error::CliError;
use state::{LoadReport, Session};

// =============================================================================
// Command Line
// =============================================================================

/// Point-of-sale ledger with tiered quantity discounts.
#[derive(Debug, Parser)]
#[command(name = "kasse")]
#[command(version)]
pub struct Args {
    /// Price file: <barcode>,<category>,<name>,<kr>,<ore> per line
    pub prices: Option<PathBuf>,

    /// Discount file: <barcode>,<limit>,<kr>,<ore> per line
    pub discounts: Option<PathBuf>,

    /// Receipt file: one barcode per line, printed at startup
    pub receipt: Option<PathBuf>,

    /// Config file (defaults to KASSE_CONFIG, then the platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Receipt layout
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StyleArg {
    /// Grouped by category, with discounts, marks and tax
    Category,
    /// Only the total
    Totals,
}

impl From<StyleArg> for ReceiptStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Category => ReceiptStyle::Category,
            StyleArg::Totals => ReceiptStyle::Totals,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Runs the application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse arguments (clap)                                              │
/// │  2. Initialize logging (stderr, RUST_LOG or "warn,kasse=info")          │
/// │  3. Load AppConfig, apply --style                                       │
/// │  4. Load PRICES / DISCOUNTS (asked for on a terminal when missing)      │
/// │  5. Print the RECEIPT file's receipt, if given                          │
/// │  6. Command loop until quit or end of input                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Only a bad config or a broken stdin/stdout ends the process early.
pub fn run() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    info!("Starting Kasse");

    let mut config = match AppConfig::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", CliError::from(e));
            return ExitCode::FAILURE;
        }
    };
    if let Some(style) = args.style {
        config.receipt.style = style.into();
    }
    debug!(?config, "Configuration loaded");

    let mut session = Session::new(&config);
    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let prompt = if interactive {
        config.session.prompt.as_str()
    } else {
        ""
    };

    let result = startup(&mut session, &args, &mut input, &mut output, interactive)
        .and_then(|()| command_loop(&mut session, &mut input, &mut output, prompt));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so receipts on stdout stay clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Every command and rejected line
/// - `RUST_LOG=kasse_core=trace,kasse_cli_lib=trace` - Everything
/// - Default: warnings, plus startup and file summaries
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kasse=info"));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// =============================================================================
// Startup
// =============================================================================

/// Loads the files named on the command line.
///
/// On a terminal, missing price and discount files are asked for; an empty
/// answer skips the step.
pub fn startup<R: BufRead, W: Write>(
    session: &mut Session,
    args: &Args,
    input: &mut R,
    output: &mut W,
    interactive: bool,
) -> io::Result<()> {
    let prices = match &args.prices {
        Some(path) => Some(path.clone()),
        None if interactive => ask_path(
            input,
            output,
            "Please provide a text file for the prices: ",
        )?,
        None => None,
    };
    if let Some(path) = prices {
        print_report(output, session.populate_catalog(&path))?;
    }

    let discounts = match &args.discounts {
        Some(path) => Some(path.clone()),
        None if interactive => ask_path(
            input,
            output,
            "You can provide a text file for the discounts: ",
        )?,
        None => None,
    };
    if let Some(path) = discounts {
        print_report(output, session.load_discounts(&path))?;
    }

    if let Some(path) = &args.receipt {
        print_startup_receipt(session, path, output)?;
    }

    Ok(())
}

fn ask_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<PathBuf>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();

    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

fn print_report<W: Write>(output: &mut W, report: Result<LoadReport, CliError>) -> io::Result<()> {
    match report {
        Ok(report) => writeln!(output, "{}", report),
        Err(e) => writeln!(output, "{}", e),
    }
}

fn print_startup_receipt<W: Write>(
    session: &mut Session,
    path: &Path,
    output: &mut W,
) -> io::Result<()> {
    match commands::print::file(session, path) {
        Ok(Reply::Text(text)) => writeln!(output, "{}", text),
        Ok(Reply::Quit) => Ok(()),
        Err(e) => writeln!(output, "{}", e),
    }
}

// =============================================================================
// Command Loop
// =============================================================================

/// Reads commands until `quit` or end of input.
///
/// Every command error is printed and the loop continues.
pub fn command_loop<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<()> {
    writeln!(
        output,
        "\nPlease provide a command. Use \"help\" to list all commands.\n"
    )?;

    let mut line = String::new();
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            info!("End of input");
            writeln!(output, "Goodbye!")?;
            return Ok(());
        }

        match commands::handle_line(session, &line) {
            Ok(Reply::Quit) => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => writeln!(output, "{}", text)?,
            Err(e) => {
                debug!(code = ?e.code, line = %line.trim(), "Command failed");
                writeln!(output, "{}", e)?;
            }
        }
    }
}

/// tokstream command-line tool: decode binary files against a token
/// layout, encode values into one, and show how a file would be chunked.
///
/// # Command overview
///
/// ```text
/// tokstream <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Tokenize a file against a layout and print the values
///   encode     Write values to a file through a layout
///   inspect    Hex dump of the chunks a file would be delivered in
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log engine state transitions (RUST_LOG overrides)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Layouts
///
/// A layout is a comma-separated list of tokens, e.g.
/// `u8,bytes:5,skip:2,text:4:latin1,i32be`.
///
/// # Exit codes
///
/// | Code | Meaning                                     |
/// |------|---------------------------------------------|
/// | 0    | Success                                     |
/// | 1    | Error (I/O failure, bad layout, bad value)  |
///
/// All error details and logs are written to stderr so stdout can be piped
/// cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;
mod layout;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Streaming binary tokenizer.
#[derive(Parser)]
#[command(name = "tokstream", version, about = "Streaming binary tokenizer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine state transitions at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a file against a layout and print every value.
    Decode(DecodeArgs),
    /// Encode a list of values through a layout into a file.
    Encode(EncodeArgs),
    /// Print the chunks a file would be delivered in, as hex.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `tokstream decode`.
///
/// ```text
/// ┌──────────────┬───────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                                │
/// ├──────────────┼───────────────────────────────────────────────────────┤
/// │ --layout     │ tokens to read, in order                              │
/// │ --repeat     │ start over at the first token until the file runs out │
/// │ --chunk-size │ bytes per delivered chunk (default 8192)              │
/// │ --json       │ print a JSON array instead of one line per value      │
/// └──────────────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// File to tokenize.
    pub file: PathBuf,

    /// Comma-separated token layout.
    #[arg(short, long)]
    pub layout: String,

    /// Cycle through the layout until the input is exhausted.
    #[arg(long)]
    pub repeat: bool,

    /// Size of the chunks the file is fed in.
    #[arg(long, default_value_t = 8192)]
    pub chunk_size: usize,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tokstream encode`.
///
/// Values pair up with layout tokens by position. Integers accept a `0x`
/// prefix; `bytes:N` values are hex when prefixed with `0x`, raw text
/// otherwise; `skip:N` cannot be encoded.
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Comma-separated token layout.
    #[arg(short, long)]
    pub layout: String,

    /// Comma-separated values, one per layout token.
    #[arg(long)]
    pub values: String,

    /// Output file.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for `tokstream inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// File to inspect.
    pub file: PathBuf,

    /// Size of the chunks the file is split into.
    #[arg(long, default_value_t = 16)]
    pub chunk_size: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

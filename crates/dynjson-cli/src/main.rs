//! `dynjson` CLI: format and check JSON documents through the dynjson codec.
//!
//! ## Usage
//!
//! ```sh
//! # Re-indent JSON (stdin → stdout)
//! echo '{"name":"Alice","tags":["a","b"]}' | dynjson fmt
//!
//! # File to file, single-line output
//! dynjson fmt -i data.json -o data.min.json --compact
//!
//! # Validate only; reports line and column on failure
//! dynjson check -i data.json
//!
//! # Tighter nesting cap, debug logging
//! dynjson --max-depth 32 -vv check -i data.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dynjson::Limits;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dynjson",
    version,
    about = "Format and validate JSON with the dynjson codec"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum table/array nesting depth
    #[arg(long, global = true, default_value_t = dynjson::limits::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Disable the nesting depth cap
    #[arg(long, global = true, conflicts_with = "max_depth")]
    unbounded: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON and write it back pretty-printed
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write single-line JSON instead of the indented layout
        #[arg(long)]
        compact: bool,
    },
    /// Parse JSON and report whether it is valid
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let limits = if cli.unbounded {
        Limits::unbounded()
    } else {
        Limits::new(cli.max_depth)
    };
    debug!(?limits, "resolved limits");

    match cli.command {
        Commands::Fmt {
            input,
            output,
            compact,
        } => {
            let json = read_input(input.as_deref())?;
            let value = dynjson::deserialize_with_limits(&json, limits)
                .context("Failed to parse JSON")?;

            let mut formatted = if compact {
                let plain = dynjson::interop::to_json_value_with_limits(&value, limits)
                    .context("Failed to convert value")?;
                serde_json::to_string(&plain)?
            } else {
                dynjson::serialize_with_limits(&value, limits)
                    .context("Failed to serialize JSON")?
            };
            formatted.push('\n');

            info!(bytes_in = json.len(), bytes_out = formatted.len(), "formatted");
            write_output(output.as_deref(), &formatted)?;
        }
        Commands::Check { input } => {
            let json = read_input(input.as_deref())?;
            dynjson::deserialize_with_limits(&json, limits).context("Invalid JSON")?;
            println!("ok");
        }
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

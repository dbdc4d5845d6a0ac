//! Command-line interface for pysource
//!
//! Usage:
//!   pysource inspect `<path>` [--format treeviz|json|tokens|outline] [--line-numbers]
//!   pysource unparse `<path>`
//!   pysource check `<path>`...
//!
//! Global options: `--config <file>` layers a TOML file over the built-in defaults,
//! `--tab-size <n>` overrides `parser.tab_size`, `-v` raises the log level (repeatable).
//! Logs go to stderr; `RUST_LOG` takes precedence over `-v`.

use clap::{Parser, Subcommand, ValueEnum};
use pysource_config::{Loader, PysourceConfig};
use pysource_parser::py::formats::{
    to_json_string, to_treeviz_str_with, tokens_to_json_string, TreevizOptions,
};
use pysource_parser::py::loader::SourceLoader;
use pysource_parser::py::outline::outline;
use similar::TextDiff;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "pysource")]
#[command(about = "Round-trip parser for Python source files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Column multiple a tab advances to
    #[arg(long, global = true, value_name = "N")]
    tab_size: Option<usize>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a file was parsed
    Inspect {
        path: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Treeviz)]
        format: Format,

        /// Prefix treeviz nodes with their line number
        #[arg(long)]
        line_numbers: bool,
    },

    /// Parse a file and print it back
    Unparse { path: PathBuf },

    /// Verify that files survive a round trip unchanged
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Treeviz,
    Json,
    Tokens,
    Outline,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.command {
        Commands::Inspect {
            path,
            format,
            line_numbers,
        } => handle_inspect_command(&config, path, *format, *line_numbers),
        Commands::Unparse { path } => handle_unparse_command(&config, path),
        Commands::Check { paths } => Ok(handle_check_command(&config, paths)),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> CliResult<PysourceConfig> {
    let mut loader = Loader::new();
    if let Some(path) = &cli.config {
        debug!(path = %path.display(), "layering configuration file");
        loader = loader.with_file(path);
    }
    if let Some(tab_size) = cli.tab_size {
        loader = loader.set_override("parser.tab_size", tab_size as i64)?;
    }
    Ok(loader.build()?)
}

fn load(config: &PysourceConfig, path: &Path) -> CliResult<SourceLoader> {
    let loader = SourceLoader::from_path(path)
        .map_err(|err| format!("{}: {}", path.display(), err))?
        .with_options(config.parse_options());
    Ok(loader)
}

/// Handle the inspect command
fn handle_inspect_command(
    config: &PysourceConfig,
    path: &Path,
    format: Format,
    line_numbers: bool,
) -> CliResult<bool> {
    let loader = load(config, path)?;
    let in_file = |err: &dyn std::fmt::Display| format!("{}: {}", path.display(), err);

    let output = match format {
        Format::Tokens => {
            let tokens = loader.tokenize().map_err(|e| in_file(&e))?;
            tokens_to_json_string(&tokens)? + "\n"
        }
        Format::Json => {
            let code = loader.parse().map_err(|e| in_file(&e))?;
            to_json_string(&code)? + "\n"
        }
        Format::Treeviz => {
            let code = loader.parse().map_err(|e| in_file(&e))?;
            let options = TreevizOptions {
                show_line_numbers: line_numbers || config.inspect.show_line_numbers,
            };
            to_treeviz_str_with(&code, &options)
        }
        Format::Outline => {
            let code = loader.parse().map_err(|e| in_file(&e))?;
            let lines = code.lines();
            let mut out = String::new();
            for item in outline(code.root(), &config.outline_options()) {
                if let Some(banner) = &item.banner {
                    let text = banner.text().unwrap_or_default();
                    out.push_str(&format!("{:>4}      {}\n", banner.line(), text));
                }
                let first = lines[item.lines.start].start().line;
                let last = *lines[item.lines.end - 1].extent().end();
                out.push_str(&format!("{:>4}-{:<4} {}", first, last, item.kind));
                if !item.commented_code.is_empty() {
                    let at: Vec<String> =
                        item.commented_code.iter().map(|l| l.to_string()).collect();
                    out.push_str(&format!(" (commented code at {})", at.join(", ")));
                }
                out.push('\n');
            }
            out
        }
    };

    print!("{}", output);
    Ok(true)
}

/// Handle the unparse command
fn handle_unparse_command(config: &PysourceConfig, path: &Path) -> CliResult<bool> {
    let code = load(config, path)?
        .parse()
        .map_err(|err| format!("{}: {}", path.display(), err))?;
    let text = code
        .unparse()
        .map_err(|err| format!("{}: {}", path.display(), err))?;
    print!("{}", text);
    Ok(true)
}

/// Handle the check command. Every file is checked even after a failure.
fn handle_check_command(config: &PysourceConfig, paths: &[PathBuf]) -> bool {
    let mut clean = true;
    for path in paths {
        match check_file(config, path) {
            Ok(None) => info!(path = %path.display(), "round trip ok"),
            Ok(Some(diff)) => {
                eprintln!("{}: round trip changed the file", path.display());
                print!("{}", diff);
                clean = false;
            }
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                clean = false;
            }
        }
    }
    clean
}

/// The unified diff between a file and its round trip, if they differ
fn check_file(config: &PysourceConfig, path: &Path) -> CliResult<Option<String>> {
    let original = String::from_utf8(std::fs::read(path)?)?;
    let code = SourceLoader::from_string(&original)
        .with_options(config.parse_options())
        .parse()?;
    let output = code.unparse()?;
    if output == original {
        return Ok(None);
    }

    let name = path.display().to_string();
    let diff = TextDiff::from_lines(&original, &output)
        .unified_diff()
        .context_radius(config.check.context_lines)
        .header(&name, &format!("{name} (round trip)"))
        .to_string();
    Ok(Some(diff))
}

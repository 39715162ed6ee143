use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use empreport::{
    parse_file,
    xml::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE, MAX_DEPTH_LIMIT},
    Document, ParserConfig, ReportConfig, ReportPrinter, DEFAULT_INPUT,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Employee XML file
    #[arg(short, long, value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Maximum element nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_parser = parse_max_depth)]
    max_depth: usize,

    /// Maximum input size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Exit with a failure status when the report cannot be completed
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn report_config(&self) -> ReportConfig {
        ReportConfig::default()
            .with_input(self.input.clone())
            .with_parser(ParserConfig {
                max_depth: self.max_depth,
                max_size: self.max_size,
            })
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            if args.strict {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn parse_max_depth(value: &str) -> std::result::Result<usize, String> {
    let depth: usize = value.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_DEPTH_LIMIT).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!("must be between 1 and {MAX_DEPTH_LIMIT}"))
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.report_config();
    // Parse before touching the output so a bad input leaves no file behind
    let doc = parse_file(&config.input, config.parser)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            report(&doc, BufWriter::new(file))
        }
        None => report(&doc, io::stdout().lock()),
    }
}

fn report<W: Write>(doc: &Document, out: W) -> Result<()> {
    let printed = ReportPrinter::new(out).print(doc)?;
    info!(printed, "report written");
    Ok(())
}

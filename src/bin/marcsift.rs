//! Map a file of ISO 2709 MARC records to JSON-lines index documents.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use flate2::read::MultiGzDecoder;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use marcsift::{catalog_mapper, Bibliographic, JsonLinesSink, MarcReader, Mapper, Record};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Parser, Debug)]
#[command(name = "marcsift")]
#[command(about = "Map MARC records to index documents")]
#[command(version)]
struct Cli {
    /// ISO 2709 input file (gzip-compressed input is detected)
    input: PathBuf,

    /// JSON rule file; replaces the built-in catalog mapping
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Value of `source_facet` in the built-in catalog mapping
    #[arg(long, default_value = "marcsift")]
    source_label: String,

    /// Stop after this many documents
    #[arg(long)]
    limit: Option<usize>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    Ok(if gzipped {
        Box::new(MultiGzDecoder::new(reader))
    } else {
        Box::new(reader)
    })
}

fn build_mapper(cli: &Cli) -> anyhow::Result<Mapper<Record>> {
    match &cli.rules {
        Some(path) => {
            let mut mapper = Mapper::new();
            Bibliographic::default().install(&mut mapper)?;
            mapper
                .import_rules_file(path)
                .with_context(|| format!("loading rules from {}", path.display()))?;
            Ok(mapper)
        },
        None => Ok(catalog_mapper(&cli.source_label)?),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mapper = build_mapper(&cli)?;
    let reader = MarcReader::new(open_input(&cli.input)?);

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = JsonLinesSink::new(output);

    let limit = cli.limit.unwrap_or(usize::MAX);
    let summary = mapper
        .process_results(reader, |doc| {
            if sink.written() >= limit {
                return Ok(ControlFlow::Break(()));
            }
            sink.write(&doc)?;
            Ok(if sink.written() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })
        .with_context(|| format!("mapping {}", cli.input.display()))?;
    sink.flush()?;

    info!(
        processed = summary.processed,
        emitted = summary.emitted,
        "done"
    );
    Ok(())
}

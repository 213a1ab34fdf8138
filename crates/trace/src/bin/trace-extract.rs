// ABOUTME: CLI binary for extracting JSON data from Glowroot trace HTML reports.
// ABOUTME: Writes combined or per-entry JSON files and reports warnings at the end of the run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use digests_trace::options::DEFAULT_OUTPUT_FILE;
use digests_trace::{
    extract_file, write_report, ExtractionReport, OutputFormat, TraceError, WriteOptions, TARGETS,
};
use tracing_subscriber::EnvFilter;

const RULE: &str = "--------------------------------------------------";

#[derive(Parser, Debug)]
#[command(name = "trace-extract", version)]
#[command(about = "Extract JSON data from Glowroot trace HTML files")]
#[command(after_help = "Examples:
  trace-extract trace.html -o extracted_data.json
  trace-extract trace.html -o data/ --separate
  trace-extract trace.html --output-dir ./analysis/")]
struct Args {
    /// Input Glowroot trace HTML file
    input_file: PathBuf,

    /// Output JSON file path
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Save each data type to a separate JSON file
    #[arg(long = "separate")]
    separate: bool,

    /// Use pretty-printed JSON (default: compact)
    #[arg(long = "pretty")]
    pretty: bool,

    /// Output directory (overrides --output)
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_extracted(report: &ExtractionReport) {
    for entry in &report.entries {
        if entry.value.is_raw() {
            continue;
        }
        println!("[OK] Extracted {}: {}", entry.tag_id, entry.value.summary());
    }
    println!(
        "Extracted {} data types from {} script tags",
        report.entries.len(),
        TARGETS.len()
    );
}

fn run(args: &Args) -> Result<ExtractionReport, TraceError> {
    println!("Processing: {}", args.input_file.display());
    println!("{}", RULE);

    let report = extract_file(&args.input_file)?;
    print_extracted(&report);
    println!("{}", RULE);

    let format = if args.pretty {
        OutputFormat::Pretty
    } else {
        OutputFormat::Compact
    };
    let opts = WriteOptions::builder()
        .separate(args.separate)
        .format(format)
        .output(&args.output)
        .output_dir(args.output_dir.clone())
        .build();

    for file in write_report(&report, &opts)? {
        match file.key {
            Some(key) => println!("[OK] Saved {} to: {}", key, file.path.display()),
            None => println!("[OK] Saved combined data to: {}", file.path.display()),
        }
    }

    Ok(report)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(report) => {
            if report.has_warnings() {
                println!("{}", RULE);
                eprintln!("{} warning(s):", report.warnings.len());
                for warning in &report.warnings {
                    eprintln!("[WARN] {}", warning);
                }
            }
            println!("{}", RULE);
            println!("[SUCCESS] Extraction completed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::from(1)
        }
    }
}

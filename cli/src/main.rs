//! paperfront CLI - fallback front-matter extraction for academic PDFs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use paperfront::batch::{load_timeout_queue, DEFAULT_TIMEOUT_MARKER};
use paperfront::render::{layout_to_text, to_json, to_text};
use paperfront::{
    load_first_page, BatchOptions, BatchOutcome, BatchRunner, ExtractOptions, FrontMatterExtractor,
    JsonFormat, PdfWordSource, WordSource,
};

#[derive(Parser)]
#[command(name = "paperfront")]
#[command(version)]
#[command(about = "Recover title, authors, affiliations, keywords and abstract from a paper's first page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract front matter from a PDF or a JSON word dump
    Extract {
        /// Input PDF or word dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output labelled plain text instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,

        /// Journal name whose running header is a banner (repeatable)
        #[arg(long = "journal", value_name = "NAME")]
        journals: Vec<String>,
    },

    /// Dump the positioned words of a PDF's first page as JSON
    Words {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show rebuilt lines with their zones
    Lines {
        /// Input PDF or word dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Journal name whose running header is a banner (repeatable)
        #[arg(long = "journal", value_name = "NAME")]
        journals: Vec<String>,
    },

    /// Re-run documents that timed out in a previous stage
    Batch {
        /// Directory holding the PDFs
        #[arg(long, env = "PAPERFRONT_PDF_DIR", value_name = "DIR")]
        pdf_dir: PathBuf,

        /// Error log of the previous stage
        #[arg(long, env = "PAPERFRONT_ERROR_LOG", value_name = "FILE")]
        error_log: PathBuf,

        /// Directory JSON records are written to
        #[arg(long, env = "PAPERFRONT_OUT_DIR", value_name = "DIR")]
        out_dir: PathBuf,

        /// Stage log (defaults to a file inside the output directory)
        #[arg(long, value_name = "FILE")]
        stage_log: Option<PathBuf>,

        /// Outcome marker selecting lines of the error log
        #[arg(long, default_value = DEFAULT_TIMEOUT_MARKER)]
        marker: String,

        /// Per-document timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            text,
            journals,
        }) => cmd_extract(&input, output.as_deref(), compact, text, journals),
        Some(Commands::Words {
            input,
            output,
            compact,
        }) => cmd_words(&input, output.as_deref(), compact),
        Some(Commands::Lines { input, journals }) => cmd_lines(&input, journals),
        Some(Commands::Batch {
            pdf_dir,
            error_log,
            out_dir,
            stage_log,
            marker,
            timeout,
            jobs,
            compact,
        }) => {
            let mut options = BatchOptions::new(pdf_dir, out_dir)
                .with_timeout(Duration::from_secs(timeout))
                .with_parallelism(jobs)
                .with_json_format(json_format(compact));
            if let Some(path) = stage_log {
                options = options.with_stage_log(path);
            }
            cmd_batch(&error_log, &marker, options)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: paperfront <COMMAND>".yellow());
            println!("       paperfront --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn extractor(journals: Vec<String>) -> FrontMatterExtractor {
    FrontMatterExtractor::with_options(ExtractOptions::new().with_journals(journals))
}

fn emit(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    text: bool,
    journals: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_first_page(input)?;
    log::info!("{}: {} words on the first page", input.display(), page.words.len());
    let extraction = extractor(journals).extract(&page);

    for degradation in &extraction.degradations {
        eprintln!("{} {}", "fallback:".yellow(), degradation);
    }

    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = extraction.to_record(filename);

    let content = if text {
        to_text(&record)
    } else {
        to_json(&record, json_format(compact))?
    };
    emit(&content, output)
}

fn cmd_words(input: &Path, output: Option<&Path>, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let page = PdfWordSource::open(input)?.first_page_words()?;
    let json = to_json(&page, json_format(compact))?;
    emit(&json, output)
}

fn cmd_lines(input: &Path, journals: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_first_page(input)?;
    let layout = extractor(journals).layout(&page);
    log::debug!("{}: {} lines, {} zones", input.display(), layout.lines.len(), layout.zones.len());

    println!("{}", input.display().to_string().cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", layout_to_text(&layout));

    Ok(())
}

fn cmd_batch(error_log: &Path, marker: &str, options: BatchOptions) -> Result<(), Box<dyn std::error::Error>> {
    let queue = load_timeout_queue(error_log, marker)?;
    log::info!("{} entries marked {:?} in {}", queue.len(), marker, error_log.display());
    if queue.is_empty() {
        println!("{}", "Nothing to do: no matching entries in the error log".yellow());
        return Ok(());
    }

    println!(
        "{} {} documents, {}s timeout",
        "Queued".cyan().bold(),
        queue.len(),
        options.timeout.as_secs()
    );

    log::debug!(
        "pdf dir {}, out dir {}, stage log {}",
        options.pdf_dir.display(),
        options.out_dir.display(),
        options.stage_log.display()
    );
    let runner = BatchRunner::new(options)?;

    let pb = ProgressBar::new(queue.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = runner.run(&queue, |report| {
        if report.outcome != BatchOutcome::Ok {
            pb.println(format!("{} {}: {}", "!".yellow(), report.filename, report.outcome));
        }
        pb.set_message(report.filename.clone());
        pb.inc(1);
    });

    pb.finish_with_message("Done!");

    println!("\n{}", "Summary".green().bold());
    println!("  {} ok: {}", "├─".dimmed(), summary.ok);
    println!("  {} errors: {}", "├─".dimmed(), summary.errors);
    println!("  {} timeouts: {}", "├─".dimmed(), summary.timeouts);
    println!("  {} missing: {}", "└─".dimmed(), summary.missing);
    println!("{} {}", "Log:".dimmed(), runner.options().stage_log.display());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "paperfront".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-based fallback front-matter extraction");
    println!();
    println!("License: MIT");
}

//! CLI binary for pdfqa-annotator.
//!
//! A thin shim over the library crate: each subcommand is one session entry
//! point, so the dataset can be built from a terminal or a script.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfqa_annotator::pipeline::encode;
use pdfqa_annotator::{
    render_page_async, AddOutcome, AnnotationSession, AnnotatorConfig, EntryDraft, PageRenderer,
    QuestionType, ScanStatus,
};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # List the PDFs of a directory, with page counts
  pdfqa scan ./pdfs --pages

  # Preview page 3: text to stdout, bitmap to a PNG
  pdfqa page ./pdfs manual.pdf --page 3 --png page3.png

  # Print the editable metadata template for a question type
  pdfqa template multiple_choice > meta.json

  # Append a multiple-choice question using the edited template
  pdfqa add ./pdfs manual.pdf --page 3 \
      --question "Which pin drives LD2?" --answer "PA5" \
      --type multiple_choice --metadata-file meta.json \
      --dataset annotations/qa.json

QUESTION TYPES:
  free_form, multiple_choice, truth_table, fill_in_the_blanks
  (any other tag is stored as given and gets the free_form template)

ENVIRONMENT VARIABLES:
  PDFQA_DATASET     Default dataset file (otherwise dataset.json)
  PDFIUM_LIB_PATH   Path to libpdfium; otherwise ./ then the system library
  RUST_LOG          Overrides the log filter
"#;

/// Author page-anchored question/answer datasets from PDF collections.
#[derive(Parser, Debug)]
#[command(
    name = "pdfqa",
    version,
    about = "Author page-anchored question/answer datasets from PDF collections",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to libpdfium.
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFQA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFQA_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the PDFs found in a directory.
    Scan {
        directory: String,

        /// Open each PDF and report its page count.
        #[arg(long)]
        pages: bool,

        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render one page: extracted text to stdout, bitmap optionally to PNG.
    Page {
        directory: String,
        pdf: String,

        /// 1-based page; clamped into range.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Write the rendered bitmap here as PNG.
        #[arg(long)]
        png: Option<PathBuf>,

        /// Print page, text, status and a PNG data-URI as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the structured-metadata template for a question type.
    Template {
        #[arg(default_value = "free_form")]
        question_type: String,
    },

    /// Append a question/answer entry to the dataset.
    Add {
        directory: String,
        pdf: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        question: String,

        #[arg(long)]
        answer: String,

        /// Question-type tag.
        #[arg(long = "type", default_value = "free_form")]
        question_type: String,

        /// Structured metadata text (JSON; anything else is stored raw).
        #[arg(long, conflicts_with_all = ["metadata_file", "no_metadata"])]
        metadata: Option<String>,

        /// Read structured metadata from a file.
        #[arg(long, conflicts_with = "no_metadata")]
        metadata_file: Option<PathBuf>,

        /// Store `null` metadata instead of the type's template.
        #[arg(long)]
        no_metadata: bool,

        /// Dataset file to append to.
        #[arg(long, env = "PDFQA_DATASET", default_value = "")]
        dataset: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut builder = AnnotatorConfig::builder();
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    let config = builder.build().context("Invalid configuration")?;

    match cli.command {
        Command::Scan {
            ref directory,
            pages,
            json,
        } => run_scan(&cli, config, directory, pages, json),
        Command::Page {
            ref directory,
            ref pdf,
            page,
            ref png,
            json,
        } => run_page(&cli, config, directory, pdf, page, png.as_ref(), json).await,
        Command::Template { ref question_type } => {
            println!("{}", pdfqa_annotator::template_for(question_type));
            Ok(())
        }
        Command::Add {
            ref directory,
            ref pdf,
            page,
            ref question,
            ref answer,
            ref question_type,
            ref metadata,
            ref metadata_file,
            no_metadata,
            ref dataset,
        } => {
            let structured_metadata = if no_metadata {
                String::new()
            } else if let Some(ref text) = metadata {
                text.clone()
            } else if let Some(ref path) = metadata_file {
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read metadata from {:?}", path))?
            } else {
                pdfqa_annotator::template_for(question_type)
            };

            let draft = EntryDraft {
                pdf_name: pdf.clone(),
                page,
                question: question.clone(),
                answer: answer.clone(),
                question_type: question_type.clone(),
                structured_metadata,
            };
            run_add(&cli, config, directory, &draft, dataset)
        }
    }
}

/// Scan into a fresh session, failing the process when nothing was found.
fn scanned_session(cli: &Cli, config: AnnotatorConfig, directory: &str) -> Result<AnnotationSession> {
    let mut session = AnnotationSession::new(config);
    let status = session.scan(directory);
    match status {
        ScanStatus::Found { .. } => {
            if !cli.quiet {
                eprintln!("{} {}", green("✔"), dim(&status.to_string()));
            }
            Ok(session)
        }
        other => bail!("{}", other),
    }
}

fn run_scan(cli: &Cli, config: AnnotatorConfig, directory: &str, pages: bool, json: bool) -> Result<()> {
    let renderer = PageRenderer::new(config.pdfium_library.clone());
    let session = scanned_session(cli, config, directory)?;
    let catalog = session.catalog();

    let counts: Vec<Option<usize>> = if pages {
        let bar = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(catalog.len() as u64)
        };
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Counting pages");
        bar.enable_steady_tick(Duration::from_millis(80));

        let counts = catalog
            .iter()
            .map(|(name, path)| {
                bar.set_message(name.to_string());
                let count = match renderer.page_count(path) {
                    Ok(n) => Some(n),
                    Err(e) => {
                        bar.println(format!("  {} {}  {}", red("✗"), name, red(&e.to_string())));
                        None
                    }
                };
                bar.inc(1);
                count
            })
            .collect();
        bar.finish_and_clear();
        counts
    } else {
        vec![None; catalog.len()]
    };

    if json {
        let items: Vec<_> = catalog
            .iter()
            .zip(&counts)
            .map(|((name, path), count)| {
                json!({ "name": name, "path": path.to_string_lossy(), "pages": count })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&items).context("Failed to serialise catalog")?
        );
    } else {
        for ((name, path), count) in catalog.iter().zip(&counts) {
            match count {
                Some(n) => println!("{name}\t{n}\t{}", path.display()),
                None => println!("{name}\t{}", path.display()),
            }
        }
    }
    Ok(())
}

async fn run_page(
    cli: &Cli,
    config: AnnotatorConfig,
    directory: &str,
    pdf: &str,
    page: usize,
    png: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let library = config.pdfium_library.clone();
    let session = scanned_session(cli, config, directory)?;
    let Some(path) = session.catalog().get(pdf) else {
        bail!("No PDF selected: '{}' is not in {}", pdf, directory);
    };

    let render = render_page_async(library, path.to_path_buf(), page).await;
    let Some(image) = render.image.as_ref() else {
        bail!("{}", render.status);
    };

    if let Some(out) = png {
        render
            .save_png(out)
            .with_context(|| format!("Failed to write PNG to {:?}", out))?;
    }

    if json {
        let data_uri = encode::to_data_uri(image).context("Failed to encode preview")?;
        let value = json!({
            "page": render.page(),
            "total_pages": render.total_pages,
            "status": render.status.to_string(),
            "text": render.text,
            "image": data_uri,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialise page")?
        );
    } else {
        println!("{}", render.text);
    }

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), render.status);
        if let Some(out) = png {
            eprintln!("   {} {}", dim("preview →"), bold(&out.display().to_string()));
        }
        if render.text.trim().is_empty() {
            eprintln!("   {}", yellow("no extractable text on this page"));
        }
    }
    Ok(())
}

fn run_add(
    cli: &Cli,
    config: AnnotatorConfig,
    directory: &str,
    draft: &EntryDraft,
    dataset: &str,
) -> Result<()> {
    if QuestionType::from_tag(&draft.question_type).is_none() && !cli.quiet {
        eprintln!(
            "{} unrecognised question type '{}'; storing it as given",
            yellow("⚠"),
            draft.question_type
        );
    }

    let session = scanned_session(cli, config, directory)?;
    let outcome = session.add_entry(draft, dataset);
    match outcome {
        AddOutcome::Added { .. } => {
            if !cli.quiet {
                eprintln!("{} {}", green("✔"), outcome);
            }
            Ok(())
        }
        AddOutcome::Rejected(_) | AddOutcome::SaveFailed { .. } => {
            eprintln!("{} {}", red("✘"), outcome);
            bail!("Entry not added")
        }
    }
}

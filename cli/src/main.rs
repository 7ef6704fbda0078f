//! pdflens CLI - outline inference and lexical search over PDF files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use pdflens::{Engine, IngestOptions, OutlineOptions, SearchOptions};

#[derive(Parser)]
#[command(name = "pdflens")]
#[command(version)]
#[command(about = "Infer PDF outlines and run lexical search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the title and heading outline of a PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum heading length in characters
        #[arg(long, default_value = "140")]
        max_heading: usize,
    },

    /// Dump per-page plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Limit extraction to the first N pages
        #[arg(short, long, value_name = "N")]
        max_pages: Option<usize>,
    },

    /// Search a PDF's paragraphs with a TF-IDF query
    Search {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Query text
        #[arg(short, long)]
        query: String,

        /// Number of results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> pdflens::Result<()> {
    match cli.command {
        Commands::Outline { input, max_heading } => {
            let source = pdflens::LopdfSource::open(&input)?;
            let options = OutlineOptions::new().with_max_heading_len(max_heading);
            let outline = pdflens::outline::outline_from_source(&source, &options)?;
            println!("{}", serde_json::to_string_pretty(&outline).expect("outline serializes"));
        }
        Commands::Text { input, max_pages } => {
            let pages = pdflens::extract_text(&input, max_pages)?;
            for (i, text) in pages.iter().enumerate() {
                if !text.trim().is_empty() {
                    println!("Page {}:\n{}\n", i + 1, text.trim_end());
                }
            }
        }
        Commands::Search {
            input,
            query,
            top_k,
        } => {
            let engine = Engine::with_options(IngestOptions::new(), SearchOptions::new());
            let doc_id = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            engine.ingest_file(&doc_id, &input)?;
            let hits = engine.search(&doc_id, &query, top_k)?;
            println!("{}", serde_json::to_string_pretty(&hits).expect("hits serialize"));
        }
    }
    Ok(())
}

mod corpus;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use search_core::batch::process_queries;
use search_core::dedup::remove_duplicates;
use search_core::{Document, DocumentStatus, Execution, SearchServer};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (JSON/JSONL file or a directory of them)
    #[arg(long)]
    input: PathBuf,
    /// Space separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for each query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Rank on the rayon pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Only documents with this status
        #[arg(long, default_value = "ACTIVE")]
        status: DocumentStatus,
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Print which query words every document matches
    Match {
        #[command(flatten)]
        corpus: CorpusArgs,
        query: String,
    },
    /// Remove documents with identical word sets
    Dedup {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, parallel, status, queries } => {
            let server = open(&corpus)?;
            let execution = if parallel { Execution::Parallel } else { Execution::Sequential };
            search(&server, execution, status, &queries)
        }
        Commands::Match { corpus, query } => {
            let server = open(&corpus)?;
            for id in &server {
                let (words, status) = server.match_document(&query, id)?;
                let words = words.join(" ");
                println!("{{ document_id = {id}, status = {status}, words = {words} }}");
            }
            Ok(())
        }
        Commands::Dedup { corpus } => {
            let mut server = open(&corpus)?;
            let before = server.document_count();
            for id in remove_duplicates(&mut server) {
                println!("Found duplicate document id {id}");
            }
            println!("documents: {before} -> {}", server.document_count());
            Ok(())
        }
    }
}

fn open(args: &CorpusArgs) -> Result<SearchServer> {
    let mut server = SearchServer::from_stop_words_text(&args.stop_words)?;
    corpus::load(&mut server, &args.input)?;
    Ok(server)
}

fn search(
    server: &SearchServer,
    execution: Execution,
    status: DocumentStatus,
    queries: &[String],
) -> Result<()> {
    // The batch helper always ranks ACTIVE documents sequentially per query.
    if queries.len() > 1 && execution == Execution::Sequential && status == DocumentStatus::Active {
        for (query, documents) in queries.iter().zip(process_queries(server, queries)?) {
            print_results(query, &documents);
        }
        return Ok(());
    }
    for query in queries {
        let documents = server.find_top_documents_with(execution, query, |_, s, _| s == status)?;
        print_results(query, &documents);
    }
    Ok(())
}

fn print_results(query: &str, documents: &[Document]) {
    println!("Search results for: {query}");
    for document in documents {
        println!("{document}");
    }
}

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::{config::DEFAULT_NUM_RESULTS, doc_id::DocId};

#[derive(Debug, Parser)]
#[command(
    name = "mdsearch",
    about = "Search the markdown files of a source archive or directory"
)]
pub struct Cli {
    /// Load documents from a .zip or .tar.gz source archive
    #[arg(long, global = true, conflicts_with = "dir")]
    pub archive: Option<PathBuf>,

    /// Load documents from a directory tree
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Match keyword filters (e.g. filename) ignoring case
    #[arg(long, global = true)]
    pub ignore_case: bool,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the indexed documents
    Search(SearchArgs),
    /// Print a document by id
    Get(GetArgs),
    /// Show index statistics
    Stats(StatsArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_RESULTS)]
    pub count: usize,

    /// Keep only documents whose FIELD equals VALUE (repeatable)
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "FIELD=VALUE",
        value_parser = parse_filter
    )]
    pub filters: Vec<(String, String)>,

    /// Weight a text field's score (repeatable, default 1.0)
    #[arg(
        short = 'b',
        long = "boost",
        value_name = "FIELD=WEIGHT",
        value_parser = parse_boost
    )]
    pub boosts: Vec<(String, f32)>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "files")]
    pub json: bool,

    /// Output only filenames (one per line)
    #[arg(long)]
    pub files: bool,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

// -- Get --

#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Document id as shown in search results (e.g. 3 or #3)
    pub id: DocId,

    /// Output as JSON with all stored fields
    #[arg(long)]
    pub json: bool,
}

// -- Stats --

#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "mdsearch",
            &mut std::io::stdout(),
        );
    }
}

fn split_pair(s: &str) -> Result<(&str, &str), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(format!("expected FIELD=VALUE, got {s:?}")),
    }
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (field, value) = split_pair(s)?;
    Ok((field.to_string(), value.to_string()))
}

fn parse_boost(s: &str) -> Result<(String, f32), String> {
    let (field, weight) = split_pair(s)?;
    let weight = weight
        .parse::<f32>()
        .map_err(|e| format!("invalid weight {weight:?}: {e}"))?;
    Ok((field.to_string(), weight))
}

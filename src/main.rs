use std::io::Write;

use clap::Parser;
use mdsearch::{
    Index,
    IndexConfig,
    Source,
    cli::{Cli, Command, GetArgs, StatsArgs},
    error,
    index::IndexStats,
    search,
    source::CONTENT_FIELD,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("MDSEARCH_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let output = match &cli.command {
        Command::Completions(args) => {
            args.generate();
            return Ok(());
        }
        Command::Search(args) => {
            let index = build_index(&cli)?;
            let results = search::execute_search(args, &index)?;
            if args.json {
                search::format_json(&results, &args.query_text())? + "\n"
            } else if args.files {
                search::format_files(&results)
            } else {
                search::format_human(&results)
            }
        }
        Command::Get(args) => cmd_get(&build_index(&cli)?, args)?,
        Command::Stats(args) => cmd_stats(&build_index(&cli)?.stats(), args)?,
    };

    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

fn build_index(cli: &Cli) -> error::Result<Index> {
    let source = Source::resolve(cli.archive.as_deref(), cli.dir.as_deref())?;
    let config =
        IndexConfig::markdown().case_insensitive_keywords(cli.ignore_case);
    Index::build(source.load()?, config)
}

fn cmd_get(index: &Index, args: &GetArgs) -> error::Result<String> {
    let document = index.get(args.id)?;

    if args.json {
        return Ok(serde_json::to_string_pretty(document)? + "\n");
    }

    let mut out = String::new();
    for (name, value) in document.fields() {
        if name != CONTENT_FIELD {
            out.push_str(&format!("{name}: {value}\n"));
        }
    }
    if let Some(content) = document.get(CONTENT_FIELD) {
        out.push('\n');
        out.push_str(content);
        if !content.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

fn cmd_stats(stats: &IndexStats, args: &StatsArgs) -> error::Result<String> {
    if args.json {
        return Ok(serde_json::to_string_pretty(stats)? + "\n");
    }

    let mut out = format!("documents: {}\n", stats.documents);
    for field in &stats.text_fields {
        out.push_str(&format!(
            "text field {}: {} terms\n",
            field.name, field.distinct
        ));
    }
    for field in &stats.keyword_fields {
        out.push_str(&format!(
            "keyword field {}: {} values\n",
            field.name, field.distinct
        ));
    }
    Ok(out)
}

use serde::Serialize;

use crate::{
    cli::SearchArgs,
    config::SearchParams,
    error::Result,
    index::{Index, SearchHit},
    source::{CONTENT_FIELD, FILENAME_FIELD, TITLE_FIELD},
    text_util::{add_line_numbers, extract_snippet},
};

/// A search result as presented to the user.
#[derive(Debug, Clone, Serialize)]
pub struct FinalResult {
    pub rank: usize,
    pub id: u32,
    pub score: f32,
    pub filename: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    result_count: usize,
    results: &'a [FinalResult],
}

impl SearchArgs {
    pub fn to_params(&self) -> SearchParams {
        let mut params =
            SearchParams::new(self.query_text()).num_results(self.count);
        for (field, value) in &self.filters {
            params = params.filter(field.as_str(), value.as_str());
        }
        for (field, weight) in &self.boosts {
            params = params.boost(field.as_str(), *weight);
        }
        params
    }
}

/// Run a CLI search against `index` and number the hits from 1.
pub fn execute_search(
    args: &SearchArgs,
    index: &Index,
) -> Result<Vec<FinalResult>> {
    let params = args.to_params();
    let hits = index.search(&params)?;
    Ok(to_final(&hits, &params.query))
}

fn to_final(hits: &[SearchHit<'_>], query: &str) -> Vec<FinalResult> {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let field = |name: &str| {
                hit.document.get(name).unwrap_or_default().to_string()
            };
            FinalResult {
                rank: i + 1,
                id: hit.id.get(),
                score: hit.score,
                filename: field(FILENAME_FIELD),
                title: field(TITLE_FIELD),
                snippet: hit
                    .document
                    .get(CONTENT_FIELD)
                    .and_then(|content| extract_snippet(content, query))
                    .map(|(snippet, start)| add_line_numbers(&snippet, start)),
            }
        })
        .collect()
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[FinalResult]) -> String {
    if results.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = String::new();
    for r in results {
        out.push_str(&format!(
            "{:>3}. [{:.3}] {} #{}\n",
            r.rank, r.score, r.filename, r.id
        ));
        if !r.title.is_empty() {
            out.push_str(&format!("     {}\n", r.title));
        }
        if let Some(snippet) = &r.snippet {
            for line in snippet.lines() {
                out.push_str(&format!("       {line}\n"));
            }
        }
    }
    out.push_str(&format!("\n{} result(s)\n", results.len()));
    out
}

/// Format results as a JSON document.
pub fn format_json(results: &[FinalResult], query: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SearchResponse {
        query,
        result_count: results.len(),
        results,
    })?)
}

/// Format results as plain filenames (one per line).
pub fn format_files(results: &[FinalResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}\n", r.filename))
        .collect()
}

use std::path::Path;

use crate::tokenizer::tokenize;

/// Lines of context kept on each side of a snippet's matching line.
pub const SNIPPET_CONTEXT_LINES: usize = 1;

/// Lines shown when no line of the document matches the query.
pub const SNIPPET_FALLBACK_LINES: usize = 3;

/// Maximum number of characters in a snippet before truncation.
pub const SNIPPET_MAX_CHARS: usize = 300;

/// Title of a markdown document: the first non-empty `# ` heading, or the
/// file stem when there is none.
pub fn extract_title(content: &str, path: &Path) -> String {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("# "))
        .map(str::trim)
        .find(|heading| !heading.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string()
        })
}

/// Prepend line numbers to each line of text.
///
/// `start_line` is the number to assign to the first line (1-indexed).
pub fn add_line_numbers(text: &str, start_line: usize) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", start_line + i, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Excerpt of `text` around the first line containing one of the query's
/// terms.
///
/// Matching uses the same tokenizer as the index, so a line matches when it
/// shares a term with `query`. Returns `(snippet, start_line)` with a
/// 1-indexed start line, or `None` for empty text.
pub fn extract_snippet(text: &str, query: &str) -> Option<(String, usize)> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return None;
    }

    let terms = tokenize(query);
    let hit = lines.iter().position(|line| {
        tokenize(line).iter().any(|token| terms.contains(token))
    });

    let (start, end) = match hit {
        Some(idx) => (
            idx.saturating_sub(SNIPPET_CONTEXT_LINES),
            (idx + SNIPPET_CONTEXT_LINES + 1).min(lines.len()),
        ),
        None => (0, SNIPPET_FALLBACK_LINES.min(lines.len())),
    };

    let mut snippet = lines[start..end].join("\n");
    if let Some((cut, _)) = snippet.char_indices().nth(SNIPPET_MAX_CHARS) {
        snippet.truncate(cut);
        snippet.push_str("...");
    }

    Some((snippet, start + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_heading() {
        let content = "intro\n# My Document\n\nSome body text.";
        assert_eq!(extract_title(content, Path::new("file.md")), "My Document");
    }

    #[test]
    fn title_skips_empty_heading() {
        let content = "# \n\nSome text with no real heading.";
        assert_eq!(extract_title(content, Path::new("docs/notes.md")), "notes");
    }

    #[test]
    fn title_ignores_subheadings() {
        let content = "## Section\ntext";
        assert_eq!(extract_title(content, Path::new("guide.mdx")), "guide");
    }

    #[test]
    fn add_line_numbers_custom_start() {
        assert_eq!(add_line_numbers("foo\nbar", 10), "10: foo\n11: bar");
    }

    #[test]
    fn snippet_around_matching_term() {
        let text = "line one\nline two\nFastMCP servers\nline four\nline five";
        let (snippet, start) = extract_snippet(text, "fastmcp").unwrap();
        assert_eq!(snippet, "line two\nFastMCP servers\nline four");
        assert_eq!(start, 2);
    }

    #[test]
    fn snippet_requires_whole_term() {
        let text = "a\nb\nc\nd\nfastmcpx\nfastmcp";
        let (snippet, start) = extract_snippet(text, "fastmcp").unwrap();
        assert_eq!(start, 5);
        assert!(snippet.ends_with("fastmcp"));
    }

    #[test]
    fn snippet_without_match_returns_head() {
        let text = "l1\nl2\nl3\nl4\nl5";
        let (snippet, start) = extract_snippet(text, "zzz").unwrap();
        assert_eq!(start, 1);
        assert_eq!(snippet, "l1\nl2\nl3");
    }

    #[test]
    fn snippet_of_empty_text() {
        assert!(extract_snippet("", "query").is_none());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long_line = "é".repeat(500);
        let (snippet, _) = extract_snippet(&long_line, "x").unwrap();
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS + 3);
    }
}

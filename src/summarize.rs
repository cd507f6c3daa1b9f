//! Fallback summary generation for documents without an explicit summary.
//!
//! Scores early sentences by overlap with the document's opening tokens and
//! returns the best candidates, truncated to a fixed length.

const SUMMARY_MAX_CHARS: usize = 300;
const FALLBACK_MAX_CHARS: usize = 200;
const MIN_SENTENCE_CHARS: usize = 20;
const LEAD_TOKENS: usize = 20;

/// Build a summary from the document body. Prefers real sentences that
/// echo the document's opening vocabulary; when nothing sentence-shaped
/// exists, falls back to the first stretch of cleaned text.
pub fn summarize(body: &str) -> String {
    let cleaned = strip_markup(body);

    let sentences: Vec<&str> = cleaned
        .split_terminator(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > MIN_SENTENCE_CHARS)
        .collect();

    if sentences.is_empty() {
        return truncate_at_boundary(cleaned.trim(), FALLBACK_MAX_CHARS);
    }

    let lead: std::collections::HashSet<String> = cleaned
        .split_whitespace()
        .take(LEAD_TOKENS)
        .map(|w| w.to_lowercase())
        .collect();

    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .map(|s| {
            let overlap = s
                .split_whitespace()
                .filter(|w| lead.contains(&w.to_lowercase()))
                .count();
            (overlap, *s)
        })
        .collect();
    // Stable sort keeps document order among equally-scored sentences.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut summary = String::new();
    for (_, sentence) in scored {
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(sentence);
        summary.push('.');
        if summary.len() >= SUMMARY_MAX_CHARS / 2 {
            break;
        }
    }

    truncate_at_boundary(&summary, SUMMARY_MAX_CHARS)
}

/// Strip fenced code blocks, inline code, and heading markers, leaving
/// prose. Backtick handling is positional: text between an odd and the
/// following even fence/backtick is code.
fn strip_markup(body: &str) -> String {
    // Fenced blocks first: every odd-indexed segment after splitting on
    // ``` is inside a fence.
    let prose: String = body
        .split("```")
        .enumerate()
        .filter_map(|(i, seg)| (i % 2 == 0).then_some(seg))
        .collect::<Vec<_>>()
        .join(" ");

    let prose: String = prose
        .split('`')
        .enumerate()
        .filter_map(|(i, seg)| (i % 2 == 0).then_some(seg))
        .collect::<Vec<_>>()
        .join(" ");

    prose
        .lines()
        .map(|line| line.trim_start_matches('#').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character,
/// appending an ellipsis when anything was cut.
fn truncate_at_boundary(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", text[..end].trim_end())
}

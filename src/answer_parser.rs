//! Citation resolution: normalize the inline markers of a generated answer and
//! build the deduplicated, display-ordered citation list that goes with it.

use crate::models::{AnswerPayload, CitationRecord, ParsedAnswer};

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

#[cfg(test)]
#[path = "answer_parser_test.rs"]
mod answer_parser_test;

// ============================================================================
// Marker Grammars
// ============================================================================

/// A citation marker syntax. Capture group 1 holds the 1-based index digits.
struct MarkerGrammar {
    name: &'static str,
    pattern: Regex,
}

/// Tried in order; the first grammar with any match is the only one used.
static MARKER_GRAMMARS: Lazy<Vec<MarkerGrammar>> = Lazy::new(|| {
    vec![
        MarkerGrammar {
            name: "numeric",
            pattern: Regex::new(r"\[([0-9]+)\]").unwrap(),
        },
        MarkerGrammar {
            name: "legacy-doc",
            pattern: Regex::new(r"\[doc([0-9]{1,3})\]").unwrap(),
        },
    ]
});

/// One marker occurrence in the original answer text.
struct Marker<'a> {
    start: usize,
    end: usize,
    text: &'a str,
    key: &'a str,
}

fn find_markers(text: &str) -> Vec<Marker<'_>> {
    for grammar in MARKER_GRAMMARS.iter() {
        let markers: Vec<Marker> = grammar
            .pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let key = caps.get(1)?;
                Some(Marker {
                    start: whole.start(),
                    end: whole.end(),
                    text: whole.as_str(),
                    key: key.as_str(),
                })
            })
            .collect();

        if !markers.is_empty() {
            tracing::debug!(grammar = grammar.name, count = markers.len(), "citation markers found");
            return markers;
        }
    }
    Vec::new()
}

/// Resolve a marker key against the 0-based citation array.
fn lookup<'a>(citations: &'a [CitationRecord], key: &str) -> Option<&'a CitationRecord> {
    let index = key.parse::<usize>().ok()?.checked_sub(1)?;
    citations.get(index)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the citation markers in an answer.
///
/// Returns `None` when the answer text is not a string. Markers pointing past
/// the end of `citations` are left in the text as-is and produce no record.
/// Each resolved marker is rewritten everywhere it occurs in the original text
/// as ` [n] `, where `n` is its first-occurrence display position.
///
/// Running this again on `markdown_format_text` treats the display numbers as
/// original indices, so the output is not stable under re-parsing.
pub fn parse_answer(payload: &AnswerPayload) -> Option<ParsedAnswer> {
    let text = payload.answer.as_str()?;
    let markers = find_markers(text);

    let mut citations: Vec<CitationRecord> = Vec::new();
    let mut normalized: HashMap<&str, String> = HashMap::new();

    for marker in &markers {
        let Some(record) = lookup(&payload.citations, marker.key) else {
            continue;
        };
        if citations.iter().any(|c| c.id() == Some(marker.key)) {
            continue;
        }

        let reindex = citations.len() + 1;
        normalized.insert(marker.text, format!(" [{}] ", reindex));

        let mut citation = record.clone();
        citation.set_id(marker.key);
        citation.set_reindex_id(reindex);
        citations.push(citation);
    }

    // Substitute against the original spans so inserted display markers are
    // never themselves rewritten by a later marker.
    let mut markdown = String::with_capacity(text.len());
    let mut last = 0;
    for marker in &markers {
        if let Some(display) = normalized.get(marker.text) {
            markdown.push_str(&text[last..marker.start]);
            markdown.push_str(display);
            last = marker.end;
        }
    }
    markdown.push_str(&text[last..]);

    enumerate_citations(&mut citations);

    Some(ParsedAnswer {
        citations,
        markdown_format_text: markdown,
        generated_chart: payload.generated_chart.clone(),
    })
}

/// Number repeated sources: the k-th citation from a given `filepath`, in list
/// order, gets `part_index = k`. Filepaths are compared as JSON values, and
/// records without one share a single count.
pub fn enumerate_citations(citations: &mut [CitationRecord]) {
    let mut parts: HashMap<Option<String>, usize> = HashMap::new();
    for citation in citations.iter_mut() {
        let count = parts.entry(citation.source_key()).or_insert(0);
        *count += 1;
        citation.set_part_index(*count);
    }
}

//! HTML presentation of parsed answers: markdown body, in-text citation
//! references, and the labelled source list.

use crate::models::{CitationRecord, ParsedAnswer};

use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;
use std::collections::HashSet;

/// Normalized display marker as emitted by the answer parser.
static DISPLAY_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([0-9]+)\]").unwrap());

/// Characters kept from each end of a truncated source path.
const TRUNCATED_EDGE_CHARS: usize = 20;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip raw HTML coming from model output, keeping our citation superscripts.
fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_tag_attributes("sup", &["class"])
        .clean(html)
        .to_string()
}

// ============================================================================
// Citation Labels
// ============================================================================

/// Human-readable label for a citation, e.g. `police_guidelines.md - Part 2`.
///
/// The part number comes from `part_index`, falling back to `chunk_id + 1`.
/// With `truncate`, paths longer than `max_len` characters keep only their
/// first and last characters (20 each, at most half of `max_len`), and only
/// when that actually shortens them. Citations without a filepath are
/// labelled by display id, or by `index` when they have none.
pub fn citation_label(
    citation: &CitationRecord,
    index: usize,
    truncate: bool,
    max_len: usize,
) -> String {
    if let Some(filepath) = citation.filepath_text() {
        let part = citation
            .part_index()
            .map(|p| p.to_string())
            .or_else(|| citation.chunk_id().map(|c| (c + 1).to_string()))
            .unwrap_or_default();

        let length = filepath.chars().count();
        let edge = TRUNCATED_EDGE_CHARS.min(max_len / 2);
        let name = if truncate && length > max_len && length > 2 * edge + 3 {
            let head: String = filepath.chars().take(edge).collect();
            let tail: String = filepath.chars().skip(length - edge).collect();
            format!("{}...{}", head, tail)
        } else {
            filepath
        };
        return format!("{} - Part {}", name, part);
    }

    match citation.reindex_id() {
        Some(reindex_id) => format!("Citation {}", reindex_id),
        None => format!("Citation {}", index),
    }
}

// ============================================================================
// Answer Rendering
// ============================================================================

fn citation_ref(id: &str) -> String {
    format!(
        r##"<sup class="citation-ref"><a href="#citation-{id}">{id}</a></sup>"##,
        id = id
    )
}

/// Split text events around known display markers, emitting each marker as an
/// inline superscript link. Text inside links, images and code blocks is left
/// alone: it ends up in attributes or preformatted output.
fn link_markers<'a>(
    events: impl Iterator<Item = Event<'a>>,
    known: &HashSet<&str>,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut opaque_depth = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                opaque_depth += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque_depth = opaque_depth.saturating_sub(1);
            }
            Event::Text(text) if opaque_depth == 0 => {
                let mut last = 0;
                for caps in DISPLAY_MARKER.captures_iter(text) {
                    let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    if !known.contains(id.as_str()) {
                        continue;
                    }
                    if whole.start() > last {
                        out.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
                    }
                    out.push(Event::Html(CowStr::from(citation_ref(id.as_str()))));
                    last = whole.end();
                }
                if last < text.len() {
                    out.push(Event::Text(CowStr::from(text[last..].to_string())));
                }
                continue;
            }
            _ => {}
        }
        out.push(event);
    }
    out
}

/// Render a parsed answer as an HTML fragment.
///
/// Display markers in body text that correspond to a returned citation become
/// superscript links to the matching entry of the source list; anything else
/// is left as plain text.
pub fn render_answer_html(parsed: &ParsedAnswer, max_len: usize) -> String {
    let known: HashSet<&str> = parsed
        .citations
        .iter()
        .filter_map(|c| c.reindex_id())
        .collect();

    let events = TextMergeStream::new(Parser::new(&parsed.markdown_format_text));
    let mut body = String::new();
    pulldown_cmark::html::push_html(&mut body, link_markers(events, &known).into_iter());

    let mut html = String::from("<div class=\"answer\">\n");
    html.push_str(&sanitize(&body));

    if !parsed.citations.is_empty() {
        html.push_str("<ol class=\"citations\">\n");
        for (i, citation) in parsed.citations.iter().enumerate() {
            let anchor = citation
                .reindex_id()
                .map(str::to_string)
                .unwrap_or_else(|| (i + 1).to_string());
            let label = citation_label(citation, i + 1, true, max_len);
            let title = citation
                .title()
                .map(|t| format!(r#" <span class="citation-title">{}</span>"#, html_escape(t)))
                .unwrap_or_default();

            html.push_str(&format!(
                r#"<li id="citation-{anchor}"><span class="citation-source">{label}</span>{title}</li>"#,
                anchor = html_escape(&anchor),
                label = html_escape(&label),
                title = title,
            ));
            html.push('\n');
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</div>\n");
    html
}

//! Data models for answer payloads and their citations.
//!
//! These mirror the JSON exchanged with the answer-generation backend and the
//! presentation layer. Citation records stay loosely typed; everything the
//! engine does not touch rides along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Citation Records
// ============================================================================

/// A citation as sent by the backend.
///
/// Held as a plain JSON object so that a record with odd field types is still
/// accepted and passed through untouched. The fields the engine reads or
/// writes are reached through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationRecord {
    pub fields: Map<String, Value>,
}

impl CitationRecord {
    pub fn from_filepath(filepath: impl Into<String>) -> Self {
        Self::default().with_field("filepath", filepath.into())
    }

    /// Attach a field, builder style.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Raw `filepath` value, whatever its JSON type.
    pub fn filepath(&self) -> Option<&Value> {
        self.fields.get("filepath")
    }

    /// `filepath` as display text: strings as-is, numbers in decimal.
    /// Null, empty, and non-scalar values count as absent.
    pub fn filepath_text(&self) -> Option<String> {
        match self.filepath()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Key grouping citations from the same source. Values of different JSON
    /// types never collide (`7` and `"7"` are distinct sources).
    pub fn source_key(&self) -> Option<String> {
        self.filepath().map(Value::to_string)
    }

    /// Original 1-based marker index, as written in the answer text.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// 1-based display position among deduplicated citations.
    pub fn reindex_id(&self) -> Option<&str> {
        self.fields.get("reindex_id").and_then(Value::as_str)
    }

    /// 1-based occurrence count of this source within the output list.
    pub fn part_index(&self) -> Option<u64> {
        self.fields.get("part_index").and_then(Value::as_u64)
    }

    pub fn set_id(&mut self, id: &str) {
        self.fields.insert("id".to_string(), Value::from(id));
    }

    pub fn set_reindex_id(&mut self, reindex_id: usize) {
        self.fields
            .insert("reindex_id".to_string(), Value::from(reindex_id.to_string()));
    }

    pub fn set_part_index(&mut self, part_index: usize) {
        self.fields
            .insert("part_index".to_string(), Value::from(part_index));
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Retrieval chunk number, accepted either as a JSON number or a numeric string.
    pub fn chunk_id(&self) -> Option<i64> {
        match self.fields.get("chunk_id")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

// ============================================================================
// Answer Payloads
// ============================================================================

/// An answer as delivered by the backend, before citation resolution.
///
/// `answer` is kept as a raw JSON value: anything other than a string is not
/// an error at deserialization time, it just parses to nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub citations: Vec<CitationRecord>,
    #[serde(default)]
    pub generated_chart: Option<Value>,
}

impl AnswerPayload {
    pub fn from_text(answer: impl Into<String>, citations: Vec<CitationRecord>) -> Self {
        Self {
            answer: Value::String(answer.into()),
            citations,
            generated_chart: None,
        }
    }
}

/// Display-ready answer: normalized markdown plus the deduplicated citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    pub citations: Vec<CitationRecord>,
    #[serde(rename = "markdownFormatText")]
    pub markdown_format_text: String,
    pub generated_chart: Option<Value>,
}

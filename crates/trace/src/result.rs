// ABOUTME: ExtractionReport holding parsed script blocks, run metadata and accumulated warnings.
// ABOUTME: Turns ExtractedBlocks into ParsedValues, keeping raw text when JSON parsing fails.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::extractors::ExtractedBlock;
use crate::resource::{SourceDocument, SourceEncoding};

/// Version recorded in every output document.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key of the metadata object in combined output, and stem of its file in separate output.
pub const METADATA_KEY: &str = "extraction_metadata";

/// Suffix marking an entry whose content was kept as raw text.
pub const RAW_SUFFIX: &str = "_raw";

const PREVIEW_CHARS: usize = 100;

/// Content of one extracted block.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    /// The block parsed as JSON.
    Json(Value),
    /// The block did not parse; the text is kept verbatim.
    Raw(String),
}

impl ParsedValue {
    /// Parse `raw` as JSON, falling back to the raw text.
    ///
    /// Nesting depth is unbounded: thread profiles nest two levels per stack
    /// frame, well past serde_json's default limit of 128.
    pub fn parse(raw: &str) -> (Self, Option<serde_json::Error>) {
        match parse_unbounded(raw) {
            Ok(v) => (ParsedValue::Json(v), None),
            Err(e) => (ParsedValue::Raw(raw.to_string()), Some(e)),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ParsedValue::Raw(_))
    }

    /// Short human description of the value's shape.
    pub fn summary(&self) -> String {
        match self {
            ParsedValue::Json(v) => summarize(v),
            ParsedValue::Raw(s) => format!("raw text ({} chars)", s.chars().count()),
        }
    }
}

impl Serialize for ParsedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParsedValue::Json(v) => v.serialize(serializer),
            ParsedValue::Raw(s) => serializer.serialize_str(s),
        }
    }
}

fn parse_unbounded(raw: &str) -> serde_json::Result<Value> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    // grows the stack on demand instead of overflowing on deep input
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn summarize(value: &Value) -> String {
    match value {
        Value::Object(map) => format!("object with {} keys", map.len()),
        Value::Array(items) => format!("array with {} items", items.len()),
        Value::String(s) => format!("string ({} chars)", s.chars().count()),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Null => "null".to_string(),
    }
}

/// One block that made it into the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntry {
    pub short_name: &'static str,
    pub tag_id: &'static str,
    pub value: ParsedValue,
}

impl ExtractedEntry {
    /// Output key: the short name, with `_raw` appended for unparsed text.
    pub fn key(&self) -> String {
        if self.value.is_raw() {
            format!("{}{}", self.short_name, RAW_SUFFIX)
        } else {
            self.short_name.to_string()
        }
    }
}

/// Provenance record written alongside the extracted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub source_file: String,
    pub source_path: String,
    pub extraction_time: String,
    pub tool_version: String,
    pub extracted_scripts: Vec<String>,
}

/// A per-entry problem that does not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    Missing {
        short_name: &'static str,
        tag_id: &'static str,
    },
    Empty {
        short_name: &'static str,
        tag_id: &'static str,
    },
    Unparsed {
        short_name: &'static str,
        tag_id: &'static str,
        error: String,
        preview: String,
    },
}

impl ExtractionWarning {
    pub fn short_name(&self) -> &'static str {
        match self {
            ExtractionWarning::Missing { short_name, .. }
            | ExtractionWarning::Empty { short_name, .. }
            | ExtractionWarning::Unparsed { short_name, .. } => short_name,
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::Missing { short_name, tag_id } => {
                write!(f, "{}: script tag '{}' not found", short_name, tag_id)
            }
            ExtractionWarning::Empty { short_name, tag_id } => {
                write!(f, "{}: script tag '{}' found but empty", short_name, tag_id)
            }
            ExtractionWarning::Unparsed {
                short_name,
                tag_id,
                error,
                preview,
            } => write!(
                f,
                "{}: failed to parse JSON in '{}': {} (kept as {}{}; starts with: {}...)",
                short_name, tag_id, error, short_name, RAW_SUFFIX, preview
            ),
        }
    }
}

/// Everything one run produced, ready to be written.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub metadata: ExtractionMetadata,
    pub entries: Vec<ExtractedEntry>,
    pub warnings: Vec<ExtractionWarning>,
    pub encoding: SourceEncoding,
}

impl ExtractionReport {
    /// Parse the extracted blocks of `doc` and build the run report.
    pub fn from_blocks(
        doc: &SourceDocument,
        blocks: Vec<ExtractedBlock>,
        extraction_time: DateTime<Local>,
    ) -> Self {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for block in blocks {
            let short_name = block.target.short_name;
            let tag_id = block.target.tag_id;

            let raw = match (block.found, block.raw_text) {
                (false, _) => {
                    warnings.push(ExtractionWarning::Missing { short_name, tag_id });
                    continue;
                }
                (true, None) => {
                    warnings.push(ExtractionWarning::Empty { short_name, tag_id });
                    continue;
                }
                (true, Some(raw)) => raw,
            };

            let (value, error) = ParsedValue::parse(&raw);
            if let Some(err) = error {
                warnings.push(ExtractionWarning::Unparsed {
                    short_name,
                    tag_id,
                    error: err.to_string(),
                    preview: raw.chars().take(PREVIEW_CHARS).collect(),
                });
            } else {
                info!(tag_id, summary = %value.summary(), "extracted script block");
            }

            entries.push(ExtractedEntry {
                short_name,
                tag_id,
                value,
            });
        }

        for w in &warnings {
            warn!("{}", w);
        }

        let metadata = ExtractionMetadata {
            source_file: doc.file_name(),
            source_path: absolute_path(&doc.path),
            extraction_time: extraction_time.to_rfc3339_opts(SecondsFormat::Micros, false),
            tool_version: TOOL_VERSION.to_string(),
            extracted_scripts: entries.iter().map(ExtractedEntry::key).collect(),
        };

        Self {
            metadata,
            entries,
            warnings,
            encoding: doc.encoding,
        }
    }

    /// Looks up an entry by short name.
    pub fn entry(&self, short_name: &str) -> Option<&ExtractedEntry> {
        self.entries.iter().find(|e| e.short_name == short_name)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The combined output document: metadata first, then entries in catalog order.
    pub fn combined(&self) -> CombinedDocument<'_> {
        CombinedDocument(self)
    }
}

/// Serializable view of a report as one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct CombinedDocument<'a>(&'a ExtractionReport);

impl Serialize for CombinedDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let report = self.0;
        let mut map = serializer.serialize_map(Some(report.entries.len() + 1))?;
        map.serialize_entry(METADATA_KEY, &report.metadata)?;
        for entry in &report.entries {
            map.serialize_entry(&entry.key(), &entry.value)?;
        }
        map.end()
    }
}

fn absolute_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

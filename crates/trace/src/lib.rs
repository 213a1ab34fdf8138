// ABOUTME: Main library entry point for the Glowroot trace report extractor.
// ABOUTME: Exposes the load -> extract -> write pipeline and its public types.

//! Extracts the JSON payloads embedded in Glowroot trace HTML reports.
//!
//! A trace report carries its data in six `<script>` elements (`headerJson`,
//! `entriesJson`, ...). This crate loads the report, brackets those elements
//! without relying on well-formed markup, parses their contents as JSON and
//! writes them back out as standalone documents.
//!
//! # Example
//!
//! ```no_run
//! use digests_trace::{extract_file, write_report, OutputFormat, TraceError, WriteOptions};
//!
//! fn main() -> Result<(), TraceError> {
//!     let report = extract_file("trace.html")?;
//!     let opts = WriteOptions::builder()
//!         .format(OutputFormat::Pretty)
//!         .output("trace.json")
//!         .build();
//!     write_report(&report, &opts)?;
//!     for warning in &report.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```

use std::path::Path;

use chrono::Local;

pub mod catalog;
pub mod error;
pub mod extractors;
pub mod formats;
pub mod options;
pub mod resource;
pub mod result;

pub use crate::catalog::{ExtractionTarget, TARGETS};
pub use crate::error::{ErrorCode, TraceError};
pub use crate::extractors::{extract_blocks, ExtractedBlock};
pub use crate::formats::{render, to_json_string, write_report, RenderedFile};
pub use crate::options::{OutputFormat, OutputMode, WriteOptions, WriteOptionsBuilder};
pub use crate::resource::{load_source, SourceDocument, SourceEncoding};
pub use crate::result::{
    ExtractedEntry, ExtractionMetadata, ExtractionReport, ExtractionWarning, ParsedValue,
    TOOL_VERSION,
};

/// Extract and parse every catalogued block of an already loaded document.
pub fn extract_document(doc: &SourceDocument) -> ExtractionReport {
    let blocks = extract_blocks(&doc.text);
    ExtractionReport::from_blocks(doc, blocks, Local::now())
}

/// Load the report at `path` and extract it.
pub fn extract_file(path: impl AsRef<Path>) -> Result<ExtractionReport, TraceError> {
    let doc = load_source(path)?;
    Ok(extract_document(&doc))
}

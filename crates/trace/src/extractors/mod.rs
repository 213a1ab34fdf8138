// ABOUTME: Extraction of the catalogued script blocks from a decoded trace report.
// ABOUTME: Produces one ExtractedBlock per catalog entry, found or not.

//! Script block extraction.
//!
//! Submodules:
//! - `script`: offset-based scanner for script elements.

pub mod script;

use tracing::debug;

use crate::catalog::{ExtractionTarget, TARGETS};

/// What the scanner found for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    pub target: &'static ExtractionTarget,
    /// The script tag was present in the document.
    pub found: bool,
    /// Trimmed content; `None` when the tag is missing or its content is empty.
    pub raw_text: Option<String>,
}

impl ExtractedBlock {
    pub fn short_name(&self) -> &'static str {
        self.target.short_name
    }

    /// Tag present but nothing inside it.
    pub fn is_empty(&self) -> bool {
        self.found && self.raw_text.is_none()
    }
}

/// Extracts every catalog entry from `text`, in catalog order.
///
/// The document is scanned once; the first script carrying each id wins.
pub fn extract_blocks(text: &str) -> Vec<ExtractedBlock> {
    let mut contents: Vec<Option<&str>> = vec![None; TARGETS.len()];
    let mut remaining = TARGETS.len();

    for span in script::scan_scripts(text) {
        let Some(id) = span.id else { continue };
        let Some(idx) = TARGETS.iter().position(|t| t.tag_id == id) else {
            continue;
        };
        if contents[idx].is_some() {
            continue;
        }
        debug!(
            tag_id = id,
            tag_start = span.tag.start,
            start = span.content.start,
            end = span.content.end,
            "found script block"
        );
        contents[idx] = Some(span.text(text));
        remaining -= 1;
        if remaining == 0 {
            break;
        }
    }

    TARGETS
        .iter()
        .zip(contents)
        .map(|(target, content)| ExtractedBlock {
            target,
            found: content.is_some(),
            raw_text: content.filter(|c| !c.is_empty()).map(str::to_owned),
        })
        .collect()
}

// ABOUTME: Loader for trace report files on disk.
// ABOUTME: Reads raw bytes and decodes them as strict UTF-8, falling back to Latin-1.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TraceError;

/// Character encoding a source file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Latin1 => "latin-1",
        };
        write!(f, "{}", s)
    }
}

/// A loaded trace report.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
    pub encoding: SourceEncoding,
}

impl SourceDocument {
    /// Builds a document from in-memory bytes, using the same decoding as [`load_source`].
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let (text, encoding) = decode_bytes(bytes);
        Self {
            path: path.into(),
            text,
            encoding,
        }
    }

    /// The file name component of the source path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Read and decode the file at `path`.
///
/// A missing or unreadable file is an `InputNotFound` error. Decoding never
/// fails: bytes that are not valid UTF-8 are read as Latin-1.
pub fn load_source(path: impl AsRef<Path>) -> Result<SourceDocument, TraceError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TraceError::input_not_found(
            path,
            "load",
            Some(anyhow::anyhow!("file does not exist or is not a regular file")),
        ));
    }

    let bytes = fs::read(path)
        .map_err(|e| TraceError::input_not_found(path, "read", Some(e.into())))?;

    let doc = SourceDocument::from_bytes(path, &bytes);
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        encoding = %doc.encoding,
        "loaded source document"
    );
    Ok(doc)
}

/// Decode bytes as UTF-8, or as Latin-1 if they are not valid UTF-8.
fn decode_bytes(bytes: &[u8]) -> (String, SourceEncoding) {
    if let Some(text) = encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return (text.into_owned(), SourceEncoding::Utf8);
    }
    // Latin-1 maps every byte to the code point of the same value
    let text = encoding_rs::mem::decode_latin1(bytes);
    (text.into_owned(), SourceEncoding::Latin1)
}

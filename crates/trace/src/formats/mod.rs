// ABOUTME: JSON rendering and file output for extraction reports.
// ABOUTME: Writes one combined document or one file per entry, compact or pretty.

//! Output module.
//!
//! Every document is rendered in memory before anything touches the disk, so a
//! serialization failure never leaves partial output behind. Existing files
//! with the same names are overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::TraceError;
use crate::options::{OutputFormat, OutputMode, WriteOptions};
use crate::result::{ExtractionReport, METADATA_KEY};

/// Render `value` as JSON in the requested layout.
///
/// Compact output has no insignificant whitespace; pretty output uses
/// two-space indentation. Non-ASCII text is written as UTF-8.
pub fn to_json_string<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Compact => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
}

/// One rendered output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    /// `extraction_metadata`, an entry key, or `None` for the combined document.
    pub key: Option<String>,
    pub contents: String,
}

/// Render the report into the documents `opts` asks for, without writing them.
pub fn render(
    report: &ExtractionReport,
    opts: &WriteOptions,
) -> Result<Vec<RenderedFile>, TraceError> {
    match opts.mode {
        OutputMode::Combined => {
            let path = opts.combined_path();
            let contents = to_json_string(&report.combined(), opts.format)
                .map_err(|e| TraceError::serialize(&path, "render", Some(e.into())))?;
            Ok(vec![RenderedFile {
                path,
                key: None,
                contents,
            }])
        }
        OutputMode::Separate => {
            let dir = opts.separate_dir();
            let mut files = Vec::with_capacity(report.entries.len() + 1);

            let meta_path = dir.join(format!("{}.json", METADATA_KEY));
            let contents = to_json_string(&report.metadata, opts.format)
                .map_err(|e| TraceError::serialize(&meta_path, "render", Some(e.into())))?;
            files.push(RenderedFile {
                path: meta_path,
                key: Some(METADATA_KEY.to_string()),
                contents,
            });

            for entry in &report.entries {
                let key = entry.key();
                let path = dir.join(format!("{}.json", key));
                let contents = to_json_string(&entry.value, opts.format)
                    .map_err(|e| TraceError::serialize(&path, "render", Some(e.into())))?;
                files.push(RenderedFile {
                    path,
                    key: Some(key),
                    contents,
                });
            }
            Ok(files)
        }
    }
}

/// Render and write the report. Returns the written files in order.
///
/// If any write fails, files and directories created by this call are removed
/// before the error is returned.
pub fn write_report(
    report: &ExtractionReport,
    opts: &WriteOptions,
) -> Result<Vec<RenderedFile>, TraceError> {
    let files = render(report, opts)?;
    let mut written = WrittenSet::default();

    if let Err(err) = write_all(&files, &mut written) {
        written.roll_back();
        return Err(err);
    }

    Ok(files)
}

fn write_all(files: &[RenderedFile], written: &mut WrittenSet) -> Result<(), TraceError> {
    for file in files {
        if let Some(parent) = file.path.parent() {
            if let Some(created) = create_dir(parent)? {
                written.dirs.push(created);
            }
        }
        fs::write(&file.path, &file.contents)
            .map_err(|e| TraceError::output_write(&file.path, "write", Some(e.into())))?;
        written.files.push(file.path.clone());
        info!(
            path = %file.path.display(),
            bytes = file.contents.len(),
            "wrote output file"
        );
    }
    Ok(())
}

/// Paths created by one `write_report` call.
#[derive(Debug, Default)]
struct WrittenSet {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl WrittenSet {
    fn roll_back(self) {
        for path in self.files.iter().rev() {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove partial output");
            }
        }
        // each dir did not exist before this call, so everything under it is ours
        for dir in self.dirs.iter().rev() {
            if let Err(e) = fs::remove_dir_all(dir) {
                warn!(dir = %dir.display(), error = %e, "failed to remove partial output");
            }
        }
    }
}

/// Ensures `dir` exists. Returns the outermost directory this call created.
fn create_dir(dir: &Path) -> Result<Option<PathBuf>, TraceError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(None);
    }
    let created = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .map(Path::to_path_buf);

    debug!(dir = %dir.display(), "creating output directory");
    fs::create_dir_all(dir)
        .map_err(|e| TraceError::output_write(dir, "create directory", Some(e.into())))?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::extract_blocks;
    use crate::resource::SourceDocument;
    use chrono::Local;
    use serde_json::{json, Value};

    fn sample_report() -> ExtractionReport {
        let html = r#"<script id="headerJson">{"agent":"x","nested":{"list":[1,2,3]}}</script>
<script id="entriesJson">{bad</script>"#;
        let doc = SourceDocument::from_bytes("trace.html", html.as_bytes());
        ExtractionReport::from_blocks(&doc, extract_blocks(&doc.text), Local::now())
    }

    #[test]
    fn test_compact_has_no_insignificant_whitespace() {
        let value = json!({"a": [1, 2], "b": {"c": "d e"}});
        let compact = to_json_string(&value, OutputFormat::Compact).unwrap();
        assert_eq!(compact, r#"{"a":[1,2],"b":{"c":"d e"}}"#);
    }

    #[test]
    fn test_pretty_uses_two_space_indent() {
        let value = json!({"a": [1]});
        let pretty = to_json_string(&value, OutputFormat::Pretty).unwrap();
        assert_eq!(pretty, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let value = json!({"name": "caf\u{e9}"});
        let compact = to_json_string(&value, OutputFormat::Compact).unwrap();
        assert_eq!(compact, "{\"name\":\"caf\u{e9}\"}");
    }

    #[test]
    fn test_compact_and_pretty_agree() {
        let report = sample_report();
        let compact = to_json_string(&report.combined(), OutputFormat::Compact).unwrap();
        let pretty = to_json_string(&report.combined(), OutputFormat::Pretty).unwrap();
        let a: Value = serde_json::from_str(&compact).unwrap();
        let b: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(a, b);
        assert!(compact.len() <= pretty.len());
    }

    #[test]
    fn test_render_combined_single_file() {
        let report = sample_report();
        let opts = WriteOptions::builder().output("out/trace.json").build();
        let files = render(&report, &opts).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("out/trace.json"));
        assert_eq!(files[0].key, None);

        let doc: Value = serde_json::from_str(&files[0].contents).unwrap();
        assert_eq!(doc["header"]["agent"], json!("x"));
        assert_eq!(doc["entries_raw"], json!("{bad"));
        assert!(doc.get("entries").is_none());
        assert!(doc.get("queries").is_none());
    }

    #[test]
    fn test_render_separate_files() {
        let report = sample_report();
        let opts = WriteOptions::builder()
            .mode(OutputMode::Separate)
            .output_dir(Some(PathBuf::from("split")))
            .build();
        let files = render(&report, &opts).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["extraction_metadata.json", "header.json", "entries_raw.json"]
        );
        assert!(files.iter().all(|f| f.path.parent() == Some(Path::new("split"))));
    }

    #[test]
    fn test_source_key_order_is_kept() {
        let html = r#"<script id="headerJson">{"transactionName":"/a","id":"x","active":false}</script>"#;
        let doc = SourceDocument::from_bytes("trace.html", html.as_bytes());
        let report = ExtractionReport::from_blocks(&doc, extract_blocks(&doc.text), Local::now());
        let header = &report.entry("header").unwrap().value;

        let compact = to_json_string(header, OutputFormat::Compact).unwrap();
        assert_eq!(compact, r#"{"transactionName":"/a","id":"x","active":false}"#);

        let pretty = to_json_string(header, OutputFormat::Pretty).unwrap();
        assert_eq!(
            pretty,
            "{\n  \"transactionName\": \"/a\",\n  \"id\": \"x\",\n  \"active\": false\n}"
        );
    }

    #[test]
    fn test_failed_separate_write_removes_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("split");
        fs::create_dir_all(out_dir.join("header.json")).unwrap();

        let opts = WriteOptions::builder()
            .mode(OutputMode::Separate)
            .output_dir(Some(out_dir.clone()))
            .build();
        let err = write_report(&sample_report(), &opts).unwrap_err();
        assert!(err.is_output_write());

        assert!(!out_dir.join("extraction_metadata.json").exists());
        assert!(!out_dir.join("entries_raw.json").exists());
        // pre-existing content is left alone
        assert!(out_dir.join("header.json").is_dir());
    }

    #[test]
    fn test_failed_write_removes_created_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("new").join("split");
        let opts = WriteOptions::builder()
            .mode(OutputMode::Separate)
            .output_dir(Some(out_dir.clone()))
            .build();

        let mut written = WrittenSet::default();
        let files = render(&sample_report(), &opts).unwrap();
        write_all(&files, &mut written).unwrap();
        assert_eq!(written.dirs, vec![dir.path().join("new")]);
        assert_eq!(written.files.len(), 3);

        written.roll_back();
        assert!(!dir.path().join("new").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_write_to_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let opts = WriteOptions::builder()
            .output(blocker.join("out.json"))
            .build();
        let err = write_report(&sample_report(), &opts).unwrap_err();
        assert!(err.is_output_write());
    }
}

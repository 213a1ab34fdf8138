// ABOUTME: Write configuration for extracted trace data: OutputMode, OutputFormat and WriteOptions.
// ABOUTME: WriteOptionsBuilder provides a fluent API mirroring the command-line flags.

use std::fmt;
use std::path::PathBuf;

/// Default combined output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "extracted_trace_data.json";

/// Whether extracted entries land in one document or one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Combined,
    Separate,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputMode::Combined => "combined",
            OutputMode::Separate => "separate",
        };
        write!(f, "{}", s)
    }
}

/// JSON layout of written documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Compact => "compact",
            OutputFormat::Pretty => "pretty",
        };
        write!(f, "{}", s)
    }
}

/// Where and how a run's output is written.
///
/// `output` is the combined file path. `output_dir`, when set, overrides it:
/// combined output goes to `output_dir/extracted_trace_data.json` and separate
/// files go directly into `output_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub mode: OutputMode,
    pub format: OutputFormat,
    pub output: PathBuf,
    pub output_dir: Option<PathBuf>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Combined,
            format: OutputFormat::Compact,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            output_dir: None,
        }
    }
}

impl WriteOptions {
    pub fn builder() -> WriteOptionsBuilder {
        WriteOptionsBuilder::new()
    }

    /// The file written in combined mode.
    pub fn combined_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(DEFAULT_OUTPUT_FILE),
            None => self.output.clone(),
        }
    }

    /// The directory written in separate mode.
    ///
    /// Without an explicit directory this is `<parent>/<stem>` of the output
    /// path, so the default `extracted_trace_data.json` becomes
    /// `extracted_trace_data/`.
    pub fn separate_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "extracted_trace_data".into());
        match self.output.parent() {
            Some(parent) => parent.join(stem),
            None => PathBuf::from(stem),
        }
    }
}

/// Builder for constructing WriteOptions.
#[derive(Debug, Clone, Default)]
pub struct WriteOptionsBuilder {
    opts: WriteOptions,
}

impl WriteOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            opts: WriteOptions::default(),
        }
    }

    /// Set combined or separate output.
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.opts.mode = mode;
        self
    }

    /// Shorthand for `mode(OutputMode::Separate)` when `separate` is true.
    pub fn separate(mut self, separate: bool) -> Self {
        self.opts.mode = if separate {
            OutputMode::Separate
        } else {
            OutputMode::Combined
        };
        self
    }

    /// Set compact or pretty JSON.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.opts.format = format;
        self
    }

    /// Set the combined output file path.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.opts.output = output.into();
        self
    }

    /// Set the destination directory, overriding the output path.
    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.opts.output_dir = dir;
        self
    }

    pub fn build(self) -> WriteOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_combined_compact() {
        let opts = WriteOptions::default();
        assert_eq!(opts.mode, OutputMode::Combined);
        assert_eq!(opts.format, OutputFormat::Compact);
        assert_eq!(opts.combined_path(), PathBuf::from(DEFAULT_OUTPUT_FILE));
    }

    #[test]
    fn output_dir_overrides_output() {
        let opts = WriteOptions::builder()
            .output("ignored.json")
            .output_dir(Some(PathBuf::from("analysis")))
            .build();
        assert_eq!(
            opts.combined_path(),
            PathBuf::from("analysis").join(DEFAULT_OUTPUT_FILE)
        );
        assert_eq!(opts.separate_dir(), PathBuf::from("analysis"));
    }

    #[test]
    fn separate_dir_derives_from_output_stem() {
        let opts = WriteOptions::builder()
            .separate(true)
            .output("out/data.json")
            .build();
        assert_eq!(opts.mode, OutputMode::Separate);
        assert_eq!(opts.separate_dir(), PathBuf::from("out").join("data"));

        let default_dir = WriteOptions::default().separate_dir();
        assert_eq!(default_dir, PathBuf::from("extracted_trace_data"));
    }
}

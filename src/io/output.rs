use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Where submitted form data is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` selects stdout; anything else is a file path.
    pub fn parse(spec: &str) -> Self {
        match spec {
            "-" => OutputDestination::Stdout,
            path => OutputDestination::file(path),
        }
    }
}

/// Serialization settings for submitted data.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.destinations
            .iter()
            .filter_map(|destination| match destination {
                OutputDestination::File(path) => Some(path.as_path()),
                OutputDestination::Stdout => None,
            })
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::default())
    }
}

/// Writes `value` to every destination, stdout going to the process stdout.
/// Returns how many destinations were written.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<usize> {
    emit_to(value, options, &mut io::stdout().lock())
}

/// Like [`emit`], with stdout destinations redirected into `stdout`.
pub fn emit_to(value: &Value, options: &OutputOptions, stdout: &mut impl Write) -> Result<usize> {
    if options.destinations.is_empty() {
        return Ok(0);
    }
    let mut payload = serialize_value(value, options.format, options.pretty)?;
    if !payload.ends_with('\n') {
        payload.push('\n');
    }
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => stdout
                .write_all(payload.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write submitted data to stdout")?,
            OutputDestination::File(path) => fs::write(path, &payload)
                .with_context(|| format!("failed to write submitted data to {}", path.display()))?,
        }
    }
    Ok(options.destinations.len())
}

pub fn serialize_value(value: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    let rendered: Result<String> = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(value).map_err(Into::into),
        DocumentFormat::Json => serde_json::to_string(value).map_err(Into::into),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(Into::into),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(value).map_err(Into::into),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value).map_err(Into::into),
    };
    rendered.with_context(|| format!("failed to serialize {format}"))
}

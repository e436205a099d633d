//! Report output
//!
//! A closed set of formats, each rendering the full list of repository
//! records to a string which is then written to a single file.

pub mod csv;
pub mod json;
pub mod yaml;

use crate::scanner::types::RepositoryStatistics;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// Errors produced while rendering or writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unsupported output format '{name}' (expected one of: {expected})")]
    UnknownFormat { name: String, expected: String },

    #[error("failed to encode {format} report: {message}")]
    Encode { format: String, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl crate::core::error_handling::ContextualError for OutputError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            OutputError::UnknownFormat { .. } | OutputError::Write { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        match self {
            OutputError::Encode { .. } => None,
            other => Some(other.to_string()),
        }
    }
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Report file formats
#[derive(EnumIter, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Csv => &[],
            Self::Json => &[],
            Self::Yaml => &["yml"],
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        OutputFormat::iter().map(|fmt| fmt.name())
    }

    pub fn file_ext(&self) -> &'static str {
        self.name()
    }

    /// Format implied by a file extension, if any
    pub fn from_file_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.trim().to_lowercase();
        let name = lowercase.as_str();
        Self::iter()
            .find(|fmt| fmt.name() == name || fmt.aliases().contains(&name))
            .ok_or_else(|| OutputError::UnknownFormat {
                name: s.to_string(),
                expected: Self::names().collect::<Vec<_>>().join(", "),
            })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders repository records into one format
pub trait ReportFormatter {
    fn render(&self, stats: &[RepositoryStatistics]) -> OutputResult<String>;

    fn format_type(&self) -> OutputFormat;
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Csv => Box::new(csv::CsvFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
        OutputFormat::Yaml => Box::new(yaml::YamlFormatter::new()),
    }
}

/// `gitlab-stats-<timestamp>.<ext>` in the current directory
pub fn default_file_name(format: OutputFormat, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "gitlab-stats-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.file_ext()
    ))
}

/// Render and write the report, returning the number of bytes written
pub async fn write_report(
    path: &Path,
    format: OutputFormat,
    stats: &[RepositoryStatistics],
) -> OutputResult<usize> {
    let rendered = get_formatter(format).render(stats)?;
    tokio::fs::write(path, rendered.as_bytes())
        .await
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "Wrote {} records to {} ({})",
        stats.len(),
        path.display(),
        format
    );
    Ok(rendered.len())
}

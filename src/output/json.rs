//! JSON report formatter

use super::{OutputError, OutputFormat, OutputResult, ReportFormatter};
use crate::scanner::types::RepositoryStatistics;

#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn render(&self, stats: &[RepositoryStatistics]) -> OutputResult<String> {
        let mut rendered =
            serde_json::to_string_pretty(stats).map_err(|e| OutputError::Encode {
                format: OutputFormat::Json.to_string(),
                message: e.to_string(),
            })?;
        rendered.push('\n');
        Ok(rendered)
    }

    fn format_type(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

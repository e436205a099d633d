//! YAML report formatter

use super::{OutputError, OutputFormat, OutputResult, ReportFormatter};
use crate::scanner::types::RepositoryStatistics;

#[derive(Default)]
pub struct YamlFormatter;

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for YamlFormatter {
    fn render(&self, stats: &[RepositoryStatistics]) -> OutputResult<String> {
        serde_yaml::to_string(stats).map_err(|e| OutputError::Encode {
            format: OutputFormat::Yaml.to_string(),
            message: e.to_string(),
        })
    }

    fn format_type(&self) -> OutputFormat {
        OutputFormat::Yaml
    }
}

//! TOML configuration file loading
//!
//! The config file fills in anything not given on the command line. Keys use
//! the long flag names (`gitlab-hostname`, `max-projects`, ...).

use super::args::Args;
use crate::core::error_handling::ContextualError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("{message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }

    fn value(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// `<config_dir>/Glstats/glstats.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Glstats").join("glstats.toml"))
}

impl Args {
    /// Load the explicit config file (which must exist) or the default one
    /// (if it exists), and merge it into these arguments.
    pub async fn apply_config_file(&mut self) -> Result<Option<PathBuf>, ConfigError> {
        let path = match self.config_file.clone() {
            Some(path) if !path.exists() => return Err(ConfigError::Missing { path }),
            Some(path) => path,
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let config = load_config(&path).await?;
        self.apply_toml_values(&config)?;
        log::debug!("Applied configuration from {}", path.display());
        Ok(Some(path))
    }

    /// Fill unset arguments from a parsed config table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ConfigError> {
        fill_string(config, "gitlab-hostname", &mut self.host)?;
        fill_string(config, "token", &mut self.token)?;
        fill_string(config, "format", &mut self.format)?;
        fill_string(config, "log-level", &mut self.log_level)?;
        fill_string(config, "log-format", &mut self.log_format)?;

        fill_list(config, "namespace", &mut self.namespaces)?;
        fill_list(config, "project", &mut self.projects)?;

        if self.output_file.is_none() {
            let mut value = None;
            fill_string(config, "output-file", &mut value)?;
            self.output_file = value.map(PathBuf::from);
        }
        if self.log_file.is_none() {
            let mut value = None;
            fill_string(config, "log-file", &mut value)?;
            // "none" and "-" disable file logging
            self.log_file = value
                .filter(|v| !v.eq_ignore_ascii_case("none") && v != "-")
                .map(PathBuf::from);
        }

        fill_number(config, "max-projects", &mut self.max_projects)?;
        fill_number(config, "workers", &mut self.workers)?;
        fill_number(config, "page-size", &mut self.page_size)?;
        fill_number(config, "max-pages", &mut self.max_pages)?;
        fill_number(config, "protected-branch-step", &mut self.protected_branch_step)?;
        fill_number(config, "scan-timeout", &mut self.scan_timeout)?;

        if !self.exclude_archived && !self.include_archived {
            if let Some(value) = config.get("include-archived") {
                let include = value
                    .as_bool()
                    .ok_or_else(|| ConfigError::value("include-archived", "expected true or false"))?;
                self.include_archived = include;
                self.exclude_archived = !include;
            }
        }
        if !self.color && !self.no_color {
            if let Some(value) = config.get("color") {
                let color = value
                    .as_bool()
                    .ok_or_else(|| ConfigError::value("color", "expected true or false"))?;
                self.color = color;
                self.no_color = !color;
            }
        }
        Ok(())
    }
}

async fn load_config(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn fill_string(
    config: &toml::Table,
    key: &str,
    target: &mut Option<String>,
) -> Result<(), ConfigError> {
    if target.is_some() {
        return Ok(());
    }
    if let Some(value) = config.get(key) {
        let text = value
            .as_str()
            .ok_or_else(|| ConfigError::value(key, "expected a string"))?;
        *target = Some(text.to_string());
    }
    Ok(())
}

/// Accepts a single string or an array of strings
fn fill_list(config: &toml::Table, key: &str, target: &mut Vec<String>) -> Result<(), ConfigError> {
    if !target.is_empty() {
        return Ok(());
    }
    match config.get(key) {
        None => {}
        Some(toml::Value::String(s)) => target.push(s.clone()),
        Some(toml::Value::Array(items)) => {
            for item in items {
                let text = item
                    .as_str()
                    .ok_or_else(|| ConfigError::value(key, "expected an array of strings"))?;
                target.push(text.to_string());
            }
        }
        Some(_) => return Err(ConfigError::value(key, "expected a string or array of strings")),
    }
    Ok(())
}

fn fill_number<T>(config: &toml::Table, key: &str, target: &mut Option<T>) -> Result<(), ConfigError>
where
    T: TryFrom<i64>,
{
    if target.is_some() {
        return Ok(());
    }
    if let Some(value) = config.get(key) {
        let number = value
            .as_integer()
            .ok_or_else(|| ConfigError::value(key, "expected an integer"))?;
        let converted =
            T::try_from(number).map_err(|_| ConfigError::value(key, "out of range"))?;
        *target = Some(converted);
    }
    Ok(())
}

//! CLI argument validation
//!
//! Turns the merged arguments into an immutable `ScanOptions`.

use super::args::Args;
use super::config::ConfigError;
use crate::gitlab::counts::CountLimits;
use crate::gitlab::pagination::MAX_PAGE_SIZE;
use crate::output::OutputFormat;
use crate::scanner::types::ScanOptions;
use std::time::Duration;

pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

impl Args {
    /// Validate arguments for consistency and constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(ConfigError::invalid("GitLab hostname cannot be empty"));
            }
        }
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers must be at least 1"));
        }
        if self.max_projects == Some(0) {
            return Err(ConfigError::invalid("max projects must be at least 1"));
        }
        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(ConfigError::invalid(format!(
                    "page size must be between 1 and {}",
                    MAX_PAGE_SIZE
                )));
            }
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::invalid("max pages must be at least 1"));
        }
        if self.protected_branch_step == Some(0) {
            return Err(ConfigError::invalid("protected branch step must be at least 1"));
        }
        if self.scan_timeout == Some(0) {
            return Err(ConfigError::invalid("scan timeout must be at least 1 second"));
        }
        if !Self::split_list(&self.namespaces).is_empty()
            && !Self::split_list(&self.projects).is_empty()
        {
            return Err(ConfigError::invalid(
                "--namespace and --project cannot be combined",
            ));
        }
        Ok(())
    }

    /// Report format: explicit flag, else the output file extension, else CSV
    pub fn output_format(&self) -> Result<OutputFormat, ConfigError> {
        match &self.format {
            Some(name) => name
                .parse()
                .map_err(|e: crate::output::OutputError| ConfigError::invalid(e.to_string())),
            None => Ok(self
                .output_file
                .as_deref()
                .and_then(OutputFormat::from_file_path)
                .unwrap_or_default()),
        }
    }

    pub fn scan_deadline(&self) -> Option<Duration> {
        self.scan_timeout.map(Duration::from_secs)
    }

    /// Build scan options. `env_token` is the value of `GITLAB_TOKEN`, used
    /// only when no token was given by flag or config file.
    pub fn to_scan_options(&self, env_token: Option<String>) -> Result<ScanOptions, ConfigError> {
        self.validate()?;

        let token = self
            .token
            .clone()
            .or(env_token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::invalid(format!(
                    "an access token is required (--token, config file or {})",
                    TOKEN_ENV
                ))
            })?;

        let defaults = CountLimits::default();
        let limits = CountLimits::new(
            self.page_size.unwrap_or(defaults.page_size),
            self.max_pages.unwrap_or(defaults.max_pages),
        );

        let mut builder = ScanOptions::builder()
            .token(token.trim())
            .namespaces(Self::split_list(&self.namespaces))
            .projects(Self::split_list(&self.projects))
            .output_format(self.output_format()?)
            .output_file(self.output_file.clone())
            .verbose(self.verbosity() > 0)
            .max_projects(self.max_projects)
            .include_archived(!self.exclude_archived)
            .limits(limits);
        if let Some(host) = &self.host {
            builder = builder.host(host.trim());
        }
        if let Some(workers) = self.workers {
            builder = builder.workers(workers);
        }
        if let Some(step) = self.protected_branch_step {
            builder = builder.protected_branch_step(step);
        }

        builder
            .build()
            .map_err(|e| ConfigError::invalid(e.to_string()))
    }
}

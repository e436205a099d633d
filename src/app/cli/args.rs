//! Core CLI arguments structure
//!
//! Validation and config file merging live in `validation` and `config`.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "glstats")]
#[command(about = "GitLab repository inventory statistics for migration planning")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// GitLab instance URL (default https://gitlab.com)
    #[arg(short = 's', long = "gitlab-hostname", value_name = "URL")]
    pub host: Option<String>,

    /// Access token with read_api scope (falls back to GITLAB_TOKEN)
    #[arg(short = 't', long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Group paths to scan, including subgroups*
    #[arg(short = 'n', long = "namespace", value_name = "PATHS", action = ArgAction::Append)]
    pub namespaces: Vec<String>,

    /// Project ids or paths to scan instead of a listing*
    #[arg(short = 'p', long = "project", value_name = "IDS/PATHS", action = ArgAction::Append)]
    pub projects: Vec<String>,

    /// Report file (default gitlab-stats-<timestamp>.<format>)
    #[arg(short = 'f', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Report format
    #[arg(short = 'F', long = "format", value_name = "FORMAT", value_parser = ["csv", "json", "yaml", "yml"])]
    pub format: Option<String>,

    /// Stop after this many projects
    #[arg(short = 'm', long = "max-projects", value_name = "COUNT")]
    pub max_projects: Option<usize>,

    /// Parallel workers
    #[arg(short = 'w', long = "workers", value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Skip archived projects
    #[arg(long = "exclude-archived", conflicts_with = "include_archived")]
    pub exclude_archived: bool,

    /// Include archived projects (overrides config file)
    #[arg(long = "include-archived", conflicts_with = "exclude_archived")]
    pub include_archived: bool,

    /// Items per page for comment and review sums (max 100)
    #[arg(long = "page-size", value_name = "COUNT")]
    pub page_size: Option<u32>,

    /// Page budget for comment and review sums
    #[arg(long = "max-pages", value_name = "COUNT")]
    pub max_pages: Option<u32>,

    /// Branches per additional estimated protected branch
    #[arg(long = "protected-branch-step", value_name = "COUNT")]
    pub protected_branch_step: Option<u64>,

    /// Cancel the scan after this many seconds
    #[arg(long = "scan-timeout", value_name = "SECONDS")]
    pub scan_timeout: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (overrides -v/-q)
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "simple", "ext", "json"])]
    pub log_format: Option<String>,

    /// Force coloured output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,
}

impl Args {
    /// Parse from an explicit argument list (first item is the program name)
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    /// -v/-q as a signed verbosity level
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(i8::MAX as u8) as i8
        }
    }

    /// Explicit colour choice, `None` meaning decide from the terminal
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Split comma-separated entries, trim, drop empties and duplicates
    pub fn split_list(values: &[String]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        values
            .iter()
            .flat_map(|v| v.split(','))
            .map(|v| v.trim().trim_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

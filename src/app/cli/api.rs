//! Public API exports for the CLI module

pub use crate::app::cli::args::Args;
pub use crate::app::cli::config::{default_config_path, ConfigError};
pub use crate::app::cli::display::{display_summary, format_duration, summary_table};
pub use crate::app::cli::validation::TOKEN_ENV;

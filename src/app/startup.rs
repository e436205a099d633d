//! Process startup: arguments, config, logging, runtime and the scan itself

use super::cli::args::Args;
use super::cli::display::display_summary;
use super::cli::validation::TOKEN_ENV;
use super::spinner::{should_show_spinner, TerminalProgress};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, level_for_verbosity, LogFormat, LogSettings};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::styles::clap_styles;
use crate::output::{default_file_name, write_report};
use crate::scanner::api::{
    scan_repositories, LogProgress, NoopProgress, ProgressReporter, ScannerError,
};
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

/// Run the application, returning the process exit code
pub fn startup() -> i32 {
    let args = parse_args();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("glstats: failed to start async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    runtime.block_on(run(args))
}

/// Parse the command line with help colours following the terminal
fn parse_args() -> Args {
    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let matches = Args::command().styles(clap_styles(color)).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

async fn run(mut args: Args) -> i32 {
    // Logging settings can come from the config file, so report its
    // failure only once the logger is running
    let config_result = args.apply_config_file().await;

    let use_color = args
        .color_choice()
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    colored::control::set_override(use_color);

    let settings = LogSettings {
        level: args
            .log_level
            .clone()
            .unwrap_or_else(|| level_for_verbosity(args.verbosity()).to_string()),
        format: args
            .log_format
            .as_deref()
            .and_then(LogFormat::parse)
            .unwrap_or(LogFormat::Text),
        file: args.log_file.clone(),
        color: use_color,
    };
    if let Err(e) = init_logging(&settings) {
        eprintln!("glstats: failed to initialise logging: {}", e);
        return EXIT_FAILURE;
    }

    match config_result {
        Ok(Some(path)) => log::info!("Using configuration file {}", path.display()),
        Ok(None) => log::debug!("No configuration file found"),
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return EXIT_USAGE;
        }
    }

    let options = match args.to_scan_options(std::env::var(TOKEN_ENV).ok()) {
        Ok(options) => options,
        Err(e) => {
            log_error_with_context(&e, "Validating arguments");
            return EXIT_USAGE;
        }
    };
    log::debug!("Scan options: {:?}", options);

    let shutdown = ShutdownCoordinator::new();
    shutdown.install_signal_handlers();
    let deadline = args.scan_deadline().map(|d| shutdown.trigger_after(d));

    let mut progress: Box<dyn ProgressReporter> = if should_show_spinner() {
        Box::new(TerminalProgress::new())
    } else if options.verbose {
        Box::new(LogProgress::default())
    } else {
        Box::new(NoopProgress)
    };

    let outcome = scan_repositories(&options, progress.as_mut(), &shutdown).await;
    if let Some(handle) = deadline {
        handle.abort();
    }

    let result = match outcome {
        Ok(result) => result,
        Err(ScannerError::Cancelled) => {
            log::warn!("Scan cancelled; no report written");
            return EXIT_CANCELLED;
        }
        Err(e) => {
            log_error_with_context(&e, "Repository scan");
            return EXIT_FAILURE;
        }
    };

    let report = options
        .output_file
        .clone()
        .unwrap_or_else(|| default_file_name(options.output_format, chrono::Local::now()));
    if let Err(e) = write_report(&report, options.output_format, &result.repository_stats).await {
        log_error_with_context(&e, "Writing report");
        return EXIT_FAILURE;
    }

    display_summary(&result.summary(), Some(&report), use_color);
    EXIT_OK
}

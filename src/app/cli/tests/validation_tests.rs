//! Tests for argument validation into scan options

use crate::app::cli::args::Args;
use crate::gitlab::counts::CountLimits;
use crate::output::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["glstats"];
    argv.extend_from_slice(extra);
    Args::parse_from_args(argv).unwrap()
}

#[test]
fn test_token_is_required() {
    let err = args(&[]).to_scan_options(None).unwrap_err();
    assert!(err.to_string().contains("GITLAB_TOKEN"));

    let blank = args(&["-t", "  "]).to_scan_options(None);
    assert!(blank.is_err());
}

#[test]
fn test_flag_token_wins_over_environment() {
    let options = args(&["-t", "flag"])
        .to_scan_options(Some("env".to_string()))
        .unwrap();
    assert_eq!(options.token, "flag");

    let options = args(&[]).to_scan_options(Some("env".to_string())).unwrap();
    assert_eq!(options.token, "env");
}

#[test]
fn test_scan_options_from_flags() {
    let options = args(&[
        "-t",
        "tok",
        "-s",
        "git.corp",
        "-n",
        "platform,tools",
        "--exclude-archived",
        "--page-size",
        "50",
        "--max-pages",
        "3",
        "--protected-branch-step",
        "5",
        "-w",
        "2",
    ])
    .to_scan_options(None)
    .unwrap();

    assert_eq!(options.host, "git.corp");
    assert_eq!(options.namespaces, vec!["platform", "tools"]);
    assert!(!options.include_archived);
    assert_eq!(options.limits, CountLimits::new(50, 3));
    assert_eq!(options.protected_branch_step, 5);
    assert_eq!(options.workers, 2);
}

#[test]
fn test_invalid_values_rejected() {
    for bad in [
        vec!["-w", "0"],
        vec!["-m", "0"],
        vec!["--page-size", "101"],
        vec!["--max-pages", "0"],
        vec!["--protected-branch-step", "0"],
        vec!["--scan-timeout", "0"],
        vec!["-n", "platform", "-p", "42"],
    ] {
        let mut argv = vec!["-t", "tok"];
        argv.extend(bad.iter().copied());
        assert!(
            args(&argv).to_scan_options(None).is_err(),
            "expected rejection of {:?}",
            bad
        );
    }
}

#[test]
fn test_output_format_resolution() {
    assert_eq!(args(&[]).output_format().unwrap(), OutputFormat::Csv);
    assert_eq!(
        args(&["-f", "report.yml"]).output_format().unwrap(),
        OutputFormat::Yaml
    );
    assert_eq!(
        args(&["-f", "report.yml", "-F", "json"]).output_format().unwrap(),
        OutputFormat::Json
    );

    let options = args(&["-t", "tok", "-f", "stats.json"])
        .to_scan_options(None)
        .unwrap();
    assert_eq!(options.output_format, OutputFormat::Json);
    assert_eq!(options.output_file, Some(PathBuf::from("stats.json")));
}

#[test]
fn test_scan_deadline() {
    assert_eq!(args(&[]).scan_deadline(), None);
    assert_eq!(
        args(&["--scan-timeout", "90"]).scan_deadline(),
        Some(Duration::from_secs(90))
    );
}

//! End-of-scan summary table

use crate::core::styles::StyleRole;
use crate::scanner::types::ScanSummary;
use prettytable::{format, Cell, Row, Table};
use std::path::Path;
use std::time::Duration;

/// Summary rows as (label, value, needs attention)
fn summary_rows(summary: &ScanSummary, report: Option<&Path>) -> Vec<(&'static str, String, bool)> {
    let mut rows = vec![
        ("Total projects found", summary.total_projects.to_string(), false),
        (
            "Successfully processed",
            summary.processed_projects.to_string(),
            false,
        ),
        (
            "Errors encountered",
            summary.error_count.to_string(),
            summary.error_count > 0,
        ),
        (
            "Migration issues",
            summary.migration_issue_count.to_string(),
            summary.migration_issue_count > 0,
        ),
        (
            "Lower-bound comment counts",
            summary.truncated_count.to_string(),
            summary.truncated_count > 0,
        ),
        ("Duration", format_duration(summary.duration), false),
        (
            "Average per project",
            format_duration(summary.average_per_project),
            false,
        ),
    ];
    if let Some(path) = report {
        rows.push(("Report", path.display().to_string(), false));
    }
    rows
}

pub fn summary_table(summary: &ScanSummary, report: Option<&Path>, use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let heading = Cell::new("SCAN COMPLETE");
    table.set_titles(Row::new(vec![styled(heading, StyleRole::Heading, use_color)]));

    for (label, value, attention) in summary_rows(summary, report) {
        let value_role = if attention {
            StyleRole::Attention
        } else {
            StyleRole::Value
        };
        table.add_row(Row::new(vec![
            styled(Cell::new(label), StyleRole::Label, use_color),
            styled(Cell::new(&value), value_role, use_color),
        ]));
    }
    table
}

fn styled(cell: Cell, role: StyleRole, use_color: bool) -> Cell {
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

/// Print the summary to stdout
pub fn display_summary(summary: &ScanSummary, report: Option<&Path>, use_color: bool) {
    println!();
    summary_table(summary, report, use_color).printstd();
}

/// `1h02m03s`, `4m05s`, `6.2s` or `350ms`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else if secs >= 1 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

//! Terminal style roles shared by the help output and the scan summary.
//!
//! Colouring is opt-in per call so nothing here consults global state.
//!
//! ```
//! use glstats::core::styles::StyleRole;
//! assert_eq!(StyleRole::Heading.paint("Scan", false), "Scan");
//! assert!(StyleRole::Heading.paint("Scan", true).starts_with("\x1b[1;33m"));
//! ```

use clap::builder::styling::{AnsiColor, Color as ClapColor, Style, Styles};
use colored::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleRole {
    /// Section and table headings
    Heading,
    /// Row labels in the summary table
    Label,
    /// Plain values
    Value,
    /// Counts that indicate success
    Good,
    /// Counts worth a second look (errors, truncated sums, migration flags)
    Attention,
    /// Secondary detail such as file paths
    Dim,
}

impl StyleRole {
    pub fn color(self) -> Option<Color> {
        match self {
            StyleRole::Heading => Some(Color::Yellow),
            StyleRole::Label => Some(Color::BrightGreen),
            StyleRole::Value => None,
            StyleRole::Good => Some(Color::Green),
            StyleRole::Attention => Some(Color::BrightRed),
            StyleRole::Dim => Some(Color::BrightBlack),
        }
    }

    fn bold(self) -> bool {
        matches!(self, StyleRole::Heading | StyleRole::Attention)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match (enabled, self.color().and_then(ansi_code)) {
            (true, Some(code)) if self.bold() => format!("\x1b[1;{}m{}\x1b[0m", code, text),
            (true, Some(code)) => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    /// Foreground spec for `prettytable::Cell::style_spec`
    pub fn to_prettytable_spec(self) -> Option<String> {
        let spec = match self.color()? {
            Color::Red => "Fr",
            Color::Green => "Fg",
            Color::Yellow => "Fy",
            Color::Blue => "Fb",
            Color::BrightBlack => "FK",
            Color::BrightRed => "FR",
            Color::BrightGreen => "FG",
            _ => return None,
        };
        Some(if self.bold() {
            format!("b{}", spec)
        } else {
            spec.to_string()
        })
    }
}

fn ansi_code(color: Color) -> Option<&'static str> {
    match color {
        Color::Red => Some("31"),
        Color::Green => Some("32"),
        Color::Yellow => Some("33"),
        Color::Blue => Some("34"),
        Color::BrightBlack => Some("90"),
        Color::BrightRed => Some("91"),
        Color::BrightGreen => Some("92"),
        _ => None,
    }
}

/// clap help styling built from the same roles
pub fn clap_styles(enabled: bool) -> Styles {
    if !enabled {
        return Styles::plain();
    }
    let role = |color: AnsiColor, bold: bool| {
        let style = Style::new().fg_color(Some(ClapColor::Ansi(color)));
        if bold {
            style.bold()
        } else {
            style
        }
    };
    Styles::styled()
        .header(role(AnsiColor::Yellow, true))
        .usage(role(AnsiColor::Yellow, true))
        .literal(role(AnsiColor::Cyan, false))
        .placeholder(role(AnsiColor::Green, false))
        .error(role(AnsiColor::BrightRed, true))
        .valid(role(AnsiColor::Green, false))
        .invalid(role(AnsiColor::Red, false))
}

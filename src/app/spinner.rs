//! Terminal progress line for interactive scans

use crate::scanner::progress::ProgressReporter;
use std::io::Write;

const BRAILLE_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Longest repository path shown before it is shortened from the left
const MAX_LABEL_WIDTH: usize = 48;

/// Check if the progress line should be drawn
pub fn should_show_spinner() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr()) && !log::log_enabled!(log::Level::Info)
}

/// Redraws `⠹ [3/12] group/project` on stderr as repositories complete
#[derive(Debug, Default)]
pub struct TerminalProgress {
    frame_index: usize,
    total: usize,
    current: usize,
    label: String,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_frame(&mut self) -> char {
        let frame = BRAILLE_FRAMES[self.frame_index];
        self.frame_index = (self.frame_index + 1) % BRAILLE_FRAMES.len();
        frame
    }

    fn render_line(&mut self) -> String {
        let frame = self.next_frame();
        let mut line = format!("{} [{}/{}]", frame, self.current, self.total);
        if !self.label.is_empty() {
            line.push(' ');
            line.push_str(&shorten(&self.label, MAX_LABEL_WIDTH));
        }
        line
    }

    fn draw(&mut self) {
        let line = self.render_line();
        // \x1b[K clears whatever a longer previous label left behind
        eprint!("\r{}\x1b[K", line);
        let _ = std::io::stderr().flush();
    }
}

impl ProgressReporter for TerminalProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
        self.draw();
    }

    fn update(&mut self, current: usize) {
        self.current = current;
        self.draw();
    }

    fn describe(&mut self, repository: &str) {
        self.label = repository.to_string();
    }

    fn finish(&mut self) {
        eprint!("\r\x1b[K");
        let _ = std::io::stderr().flush();
    }
}

fn shorten(label: &str, width: usize) -> String {
    let count = label.chars().count();
    if count <= width {
        return label.to_string();
    }
    let tail: String = label.chars().skip(count - (width - 1)).collect();
    format!("…{}", tail)
}

//! Progress Reporter
//!
//! The orchestrator reports through this trait from its reducer loop only, so
//! implementations never see concurrent calls.

pub trait ProgressReporter: Send {
    /// Scanning is about to begin over `total` repositories
    fn start(&mut self, total: usize);

    /// `current` repositories have completed successfully
    fn update(&mut self, current: usize);

    /// Optional hint naming the repository that just completed
    fn describe(&mut self, _repository: &str) {}

    /// Scan over, successful or not
    fn finish(&mut self);
}

/// Reporter for non-interactive runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&mut self, _total: usize) {}

    fn update(&mut self, _current: usize) {}

    fn finish(&mut self) {}
}

/// Reporter that logs milestones instead of drawing anything
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
}

impl ProgressReporter for LogProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        log::info!("Scanning {} projects", total);
    }

    fn update(&mut self, current: usize) {
        log::info!("[{}/{}] projects scanned", current, self.total);
    }

    fn describe(&mut self, repository: &str) {
        log::debug!("Scanned {}", repository);
    }

    fn finish(&mut self) {
        log::info!("Scan finished");
    }
}

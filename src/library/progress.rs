use std::time::{Duration, Instant};

use crate::config::{ProgressMode, ScanSettings};

/// How often a scan reports progress between its first and last file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgressPolicy {
    /// Every `n`th file (by zero-based index).
    Stride(usize),
    /// At most once per interval.
    Interval(Duration),
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self::Stride(5)
    }
}

impl From<&ScanSettings> for ProgressPolicy {
    fn from(s: &ScanSettings) -> Self {
        match s.progress {
            ProgressMode::Stride => Self::Stride(s.progress_stride.max(1)),
            ProgressMode::Interval => {
                Self::Interval(Duration::from_millis(s.progress_interval_ms))
            }
        }
    }
}

/// Decides which files produce a progress event. The first and last file
/// always do.
#[derive(Debug)]
pub struct Throttle {
    policy: ProgressPolicy,
    last_emit: Option<Instant>,
}

impl Throttle {
    pub fn new(policy: ProgressPolicy) -> Self {
        Self {
            policy,
            last_emit: None,
        }
    }

    pub fn should_emit(&mut self, index: usize, total: usize) -> bool {
        let edge = index == 0 || index + 1 == total;
        let due = match self.policy {
            ProgressPolicy::Stride(n) => index % n.max(1) == 0,
            ProgressPolicy::Interval(every) => self
                .last_emit
                .map(|t| t.elapsed() >= every)
                .unwrap_or(true),
        };

        if edge || due {
            self.last_emit = Some(Instant::now());
            true
        } else {
            false
        }
    }
}

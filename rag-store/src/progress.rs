//! Lightweight progress reporting.
//!
//! Use `NoopProgress` for servers and tests, and `IndicatifProgress` for
//! CLI/TTY runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used by the ingestion pipeline.
pub trait Progress: Send + Sync {
    /// Set known total steps (optional).
    fn set_total(&self, _n: u64) {}
    /// Advance by `n` steps.
    fn advance(&self, _n: u64) {}
    /// Replace current message without advancing.
    fn message(&self, _msg: &str) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter for servers/headless runs.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif-based spinner that turns into a bounded bar once the total
/// is known, so nothing is drawn as `0/0` while documents are still loading.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Spinner (unknown total).
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style.tick_chars("-\\|/ "));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn set_total(&self, n: u64) {
        self.pb.disable_steady_tick();
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            self.pb.set_style(style.progress_chars("##-"));
        }
        self.pb.set_length(n);
        self.pb.set_position(0);
    }
    fn advance(&self, n: u64) {
        self.pb.inc(n);
    }
    fn message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn quiet_spinner() -> IndicatifProgress {
        let p = IndicatifProgress::spinner();
        p.pb.set_draw_target(ProgressDrawTarget::hidden());
        p
    }

    #[test]
    fn spinner_has_no_length_until_total_is_known() {
        let p = quiet_spinner();
        p.message("loading documents");
        assert_eq!(p.pb.length(), None);

        p.set_total(5);
        p.advance(2);
        assert_eq!(p.pb.length(), Some(5));
        assert_eq!(p.pb.position(), 2);

        p.finish("done");
        assert!(p.pb.is_finished());
    }
}

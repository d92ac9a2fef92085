//! Progress reporting for tracked downloads

use crate::output::console::ConsoleFormatter;
use assist_application::{JobApiError, JobProgressNotifier};
use assist_domain::{CatalogEntry, JobHandle, JobId, JobStatus};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports download progress with one progress bar per job
pub struct JobProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<JobId, ProgressBar>>,
}

impl JobProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn bytes_message(handle: &JobHandle) -> String {
        if handle.bytes_total > 0 {
            format!(
                "{} / {}",
                ConsoleFormatter::bytes(handle.bytes_transferred),
                ConsoleFormatter::bytes(handle.bytes_total)
            )
        } else {
            String::new()
        }
    }

    fn finish_message(handle: Option<&JobHandle>) -> String {
        match handle {
            Some(h) if h.status == JobStatus::Completed => format!("{}", "done".green()),
            Some(h) if h.status == JobStatus::Failed => format!(
                "{} {}",
                "failed".red(),
                h.error.as_deref().unwrap_or_default()
            ),
            Some(h) if h.status == JobStatus::Cancelled => format!("{}", "cancelled".yellow()),
            Some(h) => h.status.to_string(),
            None => format!("{}", "removed".dimmed()),
        }
    }
}

impl Default for JobProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JobProgressNotifier for JobProgressReporter {
    fn on_job_tracked(&self, handle: &JobHandle) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let pb = bars
            .entry(handle.job_id.clone())
            .or_insert_with(|| {
                let pb = self.multi.add(ProgressBar::new(100));
                pb.set_style(Self::bar_style());
                pb.set_prefix(handle.job_id.to_string());
                pb
            });
        pb.set_position(u64::from(handle.progress_percent));
        pb.set_message(Self::bytes_message(handle));
    }

    fn on_job_progress(&self, handle: &JobHandle) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(&handle.job_id)
        {
            pb.set_position(u64::from(handle.progress_percent));
            pb.set_message(Self::bytes_message(handle));
        }
    }

    fn on_job_finished(&self, job_id: &JobId, handle: Option<&JobHandle>) {
        let Some(pb) = self.bars.lock().ok().and_then(|mut bars| bars.remove(job_id)) else {
            return;
        };
        if let Some(h) = handle {
            pb.set_position(u64::from(h.progress_percent));
        }
        pb.finish_with_message(Self::finish_message(handle));
    }

    fn on_poll_stalled(&self, job_id: &JobId, consecutive_failures: u32, error: &JobApiError) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(job_id)
        {
            pb.set_message(format!(
                "{} ({} failed polls: {})",
                "stalled".yellow(),
                consecutive_failures,
                error
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Prints one line per 10% step so logs stay readable.
#[derive(Default)]
pub struct SimpleJobProgress {
    last_step: Mutex<HashMap<JobId, u8>>,
}

impl SimpleJobProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobProgressNotifier for SimpleJobProgress {
    fn on_job_tracked(&self, handle: &JobHandle) {
        println!("{} tracking {}", "->".cyan(), handle.job_id.as_str().bold());
    }

    fn on_job_progress(&self, handle: &JobHandle) {
        let step = handle.progress_percent / 10;
        let changed = self
            .last_step
            .lock()
            .map(|mut steps| steps.insert(handle.job_id.clone(), step) != Some(step))
            .unwrap_or(false);
        if changed {
            println!("  {}", ConsoleFormatter::job_line(handle));
        }
    }

    fn on_job_finished(&self, job_id: &JobId, handle: Option<&JobHandle>) {
        if let Ok(mut steps) = self.last_step.lock() {
            steps.remove(job_id);
        }
        match handle {
            Some(h) => println!("  {}", ConsoleFormatter::job_line(h)),
            None => println!("  {} {}", job_id.as_str().bold(), "removed".dimmed()),
        }
    }

    fn on_poll_stalled(&self, job_id: &JobId, consecutive_failures: u32, error: &JobApiError) {
        println!(
            "  {} {} stalled after {} failed polls: {}",
            "!".yellow(),
            job_id.as_str().bold(),
            consecutive_failures,
            error
        );
    }

    fn on_catalog_refreshed(&self, entries: &[CatalogEntry]) {
        let installed = entries.iter().filter(|e| e.is_installed()).count();
        println!(
            "{} catalog refreshed ({} models, {} installed)",
            "->".cyan(),
            entries.len(),
            installed
        );
    }
}

//! Console output formatting for catalog listings and job states

use assist_application::StreamOutcome;
use assist_domain::{CatalogEntry, JobHandle, JobStatus, StreamStatus};
use colored::Colorize;

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per catalog entry: id, kind, size, capabilities and state.
    pub fn catalog(entries: &[CatalogEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "Catalog is empty.".dimmed());
        }

        let id_width = entries.iter().map(|e| e.id().as_str().len()).max().unwrap_or(0);
        let mut output = Self::header("Model Catalog");
        for entry in entries {
            let state = if entry.is_installed() {
                "installed".green().to_string()
            } else if let Some(download) = entry.active_download() {
                format!("downloading {}%", download.progress_percent())
                    .yellow()
                    .to_string()
            } else {
                "available".dimmed().to_string()
            };
            output.push_str(&format!(
                "  {:<id_width$}  {:<5}  {:>8}  {:<20}  {}\n",
                entry.id().as_str().bold(),
                entry.kind(),
                entry.common().size,
                entry.capabilities().join(","),
                state,
            ));
        }
        output
    }

    /// Short status line for a job.
    pub fn job_line(handle: &JobHandle) -> String {
        let status = match handle.status {
            JobStatus::Completed => "completed".green().bold(),
            JobStatus::Failed => "failed".red().bold(),
            JobStatus::Cancelled => "cancelled".yellow().bold(),
            JobStatus::Downloading => "downloading".cyan(),
            JobStatus::Queued => "queued".dimmed(),
        };
        let mut line = format!("{} {} {}%", handle.job_id.as_str().bold(), status, handle.progress_percent);
        if handle.bytes_total > 0 {
            line.push_str(&format!(
                " ({} / {})",
                Self::bytes(handle.bytes_transferred),
                Self::bytes(handle.bytes_total)
            ));
        }
        if let Some(error) = &handle.error {
            line.push_str(&format!(" - {}", error.red()));
        }
        line
    }

    /// Trailer printed after a streamed reply, if the reply did not simply
    /// finish.
    pub fn stream_trailer(outcome: &StreamOutcome) -> Option<String> {
        match outcome.status {
            StreamStatus::Cancelled => Some(format!("{}", "[cancelled]".yellow())),
            StreamStatus::Errored => Some(format!(
                "{} {}",
                "[error]".red().bold(),
                outcome
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default()
            )),
            _ => None,
        }
    }

    /// Human-readable byte count.
    pub fn bytes(n: u64) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut value = n as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{n} B")
        } else {
            format!("{value:.1} {}", UNITS[unit])
        }
    }

    fn header(title: &str) -> String {
        format!("{}\n", title.cyan().bold())
    }
}

use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Settings;
use crate::eval::Verdict;

/// Route the `log` facade to the configured decision log file.
/// Best-effort: any failure leaves logging disabled (logging must never block the hook).
pub fn init(settings: &Settings) {
    let level = LevelFilter::from_str(&settings.log_level).unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off || settings.log_file.is_empty() {
        return;
    }

    let path = std::path::PathBuf::from(shellexpand::tilde(&settings.log_file).as_ref());
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}

/// Record a verdict as one tab-separated line.
pub fn log_decision(command: &str, verdict: &Verdict) {
    // Compact single-line reason for the log (replace newlines with "; ")
    let reason_oneline = verdict.reason().unwrap_or_default().replace('\n', "; ");
    let cmd_oneline: String = command
        .chars()
        .take(200)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    log::info!(
        "{decision}\t{cmd}\t{reason}",
        decision = verdict.as_str(),
        cmd = cmd_oneline,
        reason = reason_oneline,
    );
}

use chrono::Local;
use std::io::Write;
use std::path::Path;

/// Append a failure record to the log file. Free-text block; the office
/// greps this file when a run goes missing. Append errors are swallowed so
/// logging can never mask the primary failure.
pub fn log_failure(
    log_file: &Path,
    script: &str,
    username: &str,
    with_timestamp: bool,
    install_info: &str,
    err: &anyhow::Error,
) {
    let mut block = String::new();
    block.push_str(&format!("\n-user:{username}"));
    if with_timestamp {
        block.push_str(&format!(
            "\n-time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
    }
    block.push_str(&format!("\n-Script: {script}"));
    block.push_str(&format!("\n-installinfo:{install_info}"));
    block.push_str(&format!("\n-error:{err:?}\n"));

    if let Some(parent) = log_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .and_then(|mut f| f.write_all(block.as_bytes()));
}

pub fn username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

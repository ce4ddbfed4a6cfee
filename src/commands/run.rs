use crate::config::Config;
use crate::engine;
use crate::services::{pipeline, renderer, runlog, scratch::ScratchWorkspace};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// One parcel, end to end: scratch setup, geometry pipeline, report export,
/// scratch teardown. Teardown runs on every exit path; when both the run and
/// the teardown fail, the run's error wins.
pub fn process_one(config: &Config, pid: &str, df_number: &str) -> Result<PathBuf> {
    let workspace = ScratchWorkspace::acquire(config)?;
    let result = pipeline::run(config, workspace.store(), pid)
        .and_then(|_| renderer::render(config, workspace.store(), df_number));
    let released = workspace.release();
    match result {
        Ok(path) => {
            released?;
            Ok(path)
        }
        Err(err) => {
            let _ = released;
            Err(err)
        }
    }
}

pub fn prompt(text: &str) -> Result<String> {
    println!("{text}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Interactive single-parcel mode. Failures are logged, not re-raised to the
/// terminal.
pub fn run_single(config: &Config) -> Result<()> {
    let username = runlog::username();
    println!("Running as: {username}");

    let pid = prompt("Type PID below and press enter:")?;
    let df_number =
        prompt("Type DF number below and press enter (use 'TEST' if testing):")?;

    match process_one(config, &pid, &df_number) {
        Ok(path) => info!("report written to {}", path.display()),
        Err(err) => {
            error!("run failed, see {}", config.log_file.display());
            runlog::log_failure(
                &config.log_file,
                "DF single",
                &username,
                false,
                &engine::install_info(),
                &err,
            );
        }
    }
    Ok(())
}

use crate::commands::run::{process_one, prompt};
use crate::config::Config;
use crate::engine;
use crate::services::runlog;
use anyhow::Result;
use tracing::error;

/// Interactive batch mode: collect (PID, DF number) pairs, then process them
/// strictly in sequence. There is no per-parcel isolation; the first failure
/// aborts the remaining parcels and is logged with a timestamp.
pub fn run_batch(config: &Config) -> Result<()> {
    let username = runlog::username();
    println!("\nRunning as user {username}");
    println!("\nThis program makes several DF maps in one sitting.");
    println!("Enter each PID and DF number one by one as instructed.");
    println!("Once you are finished entering parcels, press enter to generate maps.\n");

    let outcome = collect_and_process(config);

    match outcome {
        Ok(()) => {
            let _ = prompt("Program finished successfully, press ENTER to close");
        }
        Err(err) => {
            error!("batch aborted, see {}", config.log_file.display());
            runlog::log_failure(
                &config.log_file,
                "DF batch (multiple)",
                &username,
                true,
                &engine::install_info(),
                &err,
            );
        }
    }
    Ok(())
}

fn collect_and_process(config: &Config) -> Result<()> {
    let mut entries: Vec<(String, String)> = Vec::new();
    loop {
        let pid = prompt("Type one PID below (or press enter to process entered parcels):")?;
        if pid.is_empty() {
            break;
        }
        let df_number = prompt("Type one DF number below:")?;
        entries.push((pid, df_number));
    }

    let total = entries.len();
    for (i, (pid, df_number)) in entries.iter().enumerate() {
        println!("\nMaking map {}/{}...\n", i + 1, total);
        process_one(config, pid, df_number)?;
    }
    Ok(())
}

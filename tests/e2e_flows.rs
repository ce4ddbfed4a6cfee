mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn single_run_produces_pdf() {
    let env = TestEnv::new();
    env.cmd()
        .arg("run")
        .write_stdin("123-45-6789\n7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running as:"));

    assert!(env.pdf_path("DF_123-45-6789.pdf").is_file());
    assert!(env.log_contents().is_empty());
    // scratch space torn down on the success path
    assert!(!env.config.scratch_dir().exists());
}

#[test]
fn test_sentinel_suffixes_filename() {
    let env = TestEnv::new();
    env.cmd()
        .arg("run")
        .write_stdin("123-45-6789\nTEST\n")
        .assert()
        .success();

    assert!(env.pdf_path("DF_123-45-6789_TEST.pdf").is_file());
    assert!(!env.pdf_path("DF_123-45-6789.pdf").exists());
}

#[test]
fn unmatched_pid_logs_and_writes_no_pdf() {
    let env = TestEnv::new();
    // errors are logged, not re-raised to the terminal
    env.cmd()
        .arg("run")
        .write_stdin("999-99-9999\n8\n")
        .assert()
        .success();

    assert_eq!(env.pdf_count(), 0);
    let log = env.log_contents();
    assert!(log.contains("-user:"));
    assert!(log.contains("-error:"));
    assert!(!log.contains("-time:"));
    assert!(!env.config.scratch_dir().exists());
}

#[test]
fn batch_processes_all_entries_in_order() {
    let env = TestEnv::new();
    env.cmd()
        .arg("batch")
        .write_stdin("123-45-6789\n7\n987-65-4321\n9\n\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Making map 1/2")
                .and(predicate::str::contains("Making map 2/2")),
        );

    assert!(env.pdf_path("DF_123-45-6789.pdf").is_file());
    assert!(env.pdf_path("DF_987-65-4321.pdf").is_file());
    assert!(env.log_contents().is_empty());
}

#[test]
fn batch_aborts_on_failure_and_keeps_earlier_output() {
    let env = TestEnv::new();
    env.cmd()
        .arg("batch")
        .write_stdin("123-45-6789\n7\n999-99-9999\n8\n987-65-4321\n9\n\n")
        .assert()
        .success();

    // pair 1 finished before the failure; pairs 2 and 3 produced nothing
    assert!(env.pdf_path("DF_123-45-6789.pdf").is_file());
    assert!(!env.pdf_path("DF_987-65-4321.pdf").exists());
    assert_eq!(env.pdf_count(), 1);

    let log = env.log_contents();
    assert_eq!(log.matches("-error:").count(), 1);
    assert!(log.contains("-time:"));
}

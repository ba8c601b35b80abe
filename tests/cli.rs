use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn minish() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_minish"));
    // Keep a stray minish.toml in the working directory out of the picture
    cmd.current_dir(std::env::temp_dir());
    cmd
}

fn run_line(line: &str) -> Output {
    minish().arg("-c").arg(line).output().unwrap()
}

fn run_stdin(script: &str) -> Output {
    let mut child = minish()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn test_sequence_prints_ok() {
    let out = run_line("true; echo ok");
    assert_eq!(stdout(&out), "ok\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_recovery_after_failure() {
    let out = run_line("false || echo recovered");
    assert_eq!(stdout(&out), "recovered\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_pipe_counts_lines() {
    let out = run_line(r"printf 'a\nb\nc\n' | wc -l");
    assert_eq!(stdout(&out).trim(), "3");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_cd_missing_directory() {
    let out = minish()
        .current_dir("/")
        .arg("-c")
        .arg("cd /nonexistent-path; pwd")
        .output()
        .unwrap();
    assert_eq!(stdout(&out), "No such file or directory\n/\n");
}

#[test]
fn test_cd_status() {
    let out = run_line("cd /nonexistent-path");
    assert_ne!(out.status.code(), Some(0));
}

#[test]
fn test_assignment_persists_across_lines() {
    let out = run_stdin("X=5\nsh -c 'echo $X'\necho ${X}0\n");
    assert_eq!(stdout(&out), "5\n50\n");
}

#[test]
fn test_missing_binary() {
    let out = run_line("no-such-binary");
    assert_eq!(stdout(&out), "Execution failed for 'no-such-binary'\n");
    assert_ne!(out.status.code(), Some(0));
}

#[test]
fn test_exit_stops_input() {
    let out = run_stdin("echo a\nexit\necho b\n");
    assert_eq!(stdout(&out), "a\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_exit_reports_last_status() {
    let out = run_stdin("sh -c 'exit 3'\nquit\n");
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn test_parse_error() {
    let out = run_line("echo 'unterminated");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("minish:"));

    // The session keeps going after a bad line
    let out = run_stdin("echo |\necho fine\n");
    assert_eq!(stdout(&out), "fine\n");
}

#[test]
fn test_parallel_runs_both_sides() {
    let out = run_line("echo left & echo right");
    let mut lines: Vec<String> = stdout(&out).lines().map(String::from).collect();
    lines.sort();
    assert_eq!(lines, vec!["left", "right"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_append_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("log.txt");
    let line = format!("echo one > {0}; echo two >> {0}; echo three >> {0}", log.display());
    run_line(&line);
    assert_eq!(fs::read_to_string(&log).unwrap(), "one\ntwo\nthree\n");
}

#[test]
fn test_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("run.msh");
    fs::write(&script, "# greeting\necho hi\nfalse\n").unwrap();

    let out = minish().arg(&script).output().unwrap();
    assert_eq!(stdout(&out), "hi\n");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_redirect_error_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let line = "cat < /definitely/not/here.txt; echo after";

    // Default policy stops the line
    let out = minish().current_dir(dir.path()).arg("-c").arg(line).output().unwrap();
    assert_eq!(stdout(&out), "");

    let config = dir.path().join("minish.toml");
    fs::write(&config, "on_redirect_error = \"fail\"\n").unwrap();
    let out = minish().arg("--config").arg(&config).arg("-c").arg(line).output().unwrap();
    assert_eq!(stdout(&out), "after\n");
}

#[test]
fn test_config_env_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("minish.toml");
    fs::write(&config, "[env]\nGREETING = \"hello\"\n").unwrap();

    let out = minish()
        .arg("--config")
        .arg(&config)
        .arg("-c")
        .arg("echo $GREETING")
        .output()
        .unwrap();
    assert_eq!(stdout(&out), "hello\n");
}

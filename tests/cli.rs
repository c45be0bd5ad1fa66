//! Integration tests for the `drover` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const DROVERFILE: &str = r#"
Droverfile:
  tasks:
    - name: show
      summary: Print arguments
      args:
        - name: first
        - name: rest
      run: printf '%s|%s\n' {{first}} "{{rest}}"
    - name: fail
      args:
        - name: code
          default: 3
      run: exit {{code}}
    - name: build
      options:
        release|r: false
        jobs: 2
      run: echo build {{--release}} jobs={{jobs}}
    - name: files
      args:
        - name: names
          default: []
      run: echo count {{names}}
    - name: broken
      run: echo {{nope}}
    - name: idle
    - name: ask
      run: 'read x; echo "got [$x]"'
"#;

fn drover(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_drover");
    Command::new(bin)
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run drover binary")
}

fn drover_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_drover");
    let mut child = Command::new(bin)
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn drover binary");
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Droverfile.yaml"), DROVERFILE).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_synthesized_tasks() {
    let dir = project();
    let output = drover(dir.path(), &["--help"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("show"));
    assert!(stdout(&output).contains("Print arguments"));
}

#[test]
fn bare_invocation_lists_tasks() {
    let dir = project();
    let output = drover(dir.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Run the tasks defined in a Droverfile"));
    assert!(stdout(&output).contains("show"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn script_task_reads_from_stdin() {
    let dir = project();
    let output = drover_with_input(dir.path(), &["ask"], "hello\n");

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("got [hello]"));
}

#[test]
fn pass_through_overrides_last_argument() {
    let dir = project();
    let output = drover(dir.path(), &["show", "a", "b", "--", "c", "d"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("a|c d"));
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    let dir = project();
    let output = drover(dir.path(), &["show"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("FIRST"));
}

#[test]
fn task_exit_code_becomes_process_status() {
    let dir = project();

    assert_eq!(drover(dir.path(), &["fail"]).status.code(), Some(3));
    assert_eq!(drover(dir.path(), &["fail", "5"]).status.code(), Some(5));
}

#[test]
fn boolean_option_is_a_flag() {
    let dir = project();

    let plain = drover(dir.path(), &["build"]);
    assert!(stdout(&plain).contains("build jobs=2"));

    let release = drover(dir.path(), &["build", "-r", "--jobs", "8"]);
    assert!(stdout(&release).contains("build --release jobs=8"));
}

#[test]
fn variadic_argument_collects_tokens() {
    let dir = project();

    assert_eq!(stdout(&drover(dir.path(), &["files"])).lines().last(), Some("count"));
    assert!(stdout(&drover(dir.path(), &["files", "a", "b", "c"])).contains("count a b c"));
}

#[test]
fn task_without_commands_exits_zero() {
    let dir = project();
    assert!(drover(dir.path(), &["idle"]).status.success());
}

#[test]
fn task_fault_reports_location_and_fails() {
    let dir = project();
    let output = drover(dir.path(), &["broken"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).matches("ERROR: unknown placeholder {{nope}}").count(), 1);
    assert!(stderr(&output).contains("\nin "));
}

#[test]
fn unresolved_load_entry_is_fatal() {
    let dir = project();
    std::fs::write(dir.path().join(".drover.yaml"), "load:\n  Ops: ops/missing.yaml\n").unwrap();

    let output = drover(dir.path(), &["show", "a", "b"]);

    assert_eq!(output.status.code(), Some(1));
    let message = ".drover.yaml: ops/missing.yaml could not be found";
    assert_eq!(stderr(&output).matches(message).count(), 1);
    assert!(!stdout(&output).contains("a|b"));
}

#[test]
fn first_run_creates_stub_on_yes() {
    let dir = tempfile::tempdir().unwrap();

    let output = drover_with_input(dir.path(), &["show"], "y\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Should I create Droverfile.yaml here?"));
    let stub = std::fs::read_to_string(dir.path().join("Droverfile.yaml")).unwrap();
    assert!(stub.contains("Droverfile:"));
}

#[test]
fn first_run_writes_nothing_on_no() {
    let dir = tempfile::tempdir().unwrap();

    let output = drover_with_input(dir.path(), &[], "n\n");

    assert!(output.status.success());
    assert!(!dir.path().join("Droverfile.yaml").exists());
}

#[test]
fn missing_provider_falls_back_to_init() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".drover.yaml"), "load:\n  Ops: ops.yaml\n").unwrap();
    std::fs::write(dir.path().join("ops.yaml"), "Other:\n  tasks: []\n").unwrap();

    let output = drover(dir.path(), &["init"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Provider Ops was not loaded"));
    assert!(dir.path().join("Droverfile.yaml").exists());
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = project();
    let output = drover(dir.path(), &["nonsense"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unrecognized subcommand"));
}

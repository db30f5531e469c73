//! End-to-end tests driving the `mx` binary.
//!
//! Each test gets its own HOME with a config file and database, so no state
//! leaks between runs or from the host environment.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const CONFIG: &str = r#"
[[projects]]
name = "NEP"
desc = "NEP project"
nickname = "nep"

[[projects.metrics]]
name = "Story Points"
units = "Int"
desc = "Estimated effort"
range = [1, 2, 3, 5, 8]
default_value = 3

[[projects.metrics]]
name = "Compile Time"
units = "Duration"

[[projects.metrics]]
name = "Lines"
units = "Int"

[[projects]]
name = "Broken"

[[projects.metrics]]
name = "Kind"
units = "Enum"
"#;

fn mx_binary() -> String {
    env!("CARGO_BIN_EXE_mx").to_string()
}

/// Writes the config file into `temp` and returns its path.
fn write_config(temp: &Path) -> PathBuf {
    let path = temp.join("maxify.toml");
    let db_path = temp.join("data/maxify.db");
    let contents = format!(
        "database_path = {:?}\n{CONFIG}",
        db_path.display().to_string()
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn mx(temp: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let config = write_config(temp);
    let mut child = Command::new(mx_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env("XDG_DATA_HOME", temp.join(".local/share"))
        .env("LANG", "en_US.UTF-8")
        .env_remove("LC_ALL")
        .env_remove("LC_NUMERIC")
        .env_remove("MX_DATABASE_PATH")
        .env_remove("MX_LOCALE")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run mx");

    {
        let mut child_stdin = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            child_stdin.write_all(input.as_bytes()).unwrap();
        }
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_record_then_print_task() {
    let temp = TempDir::new().unwrap();

    let output = mx(
        temp.path(),
        &["task", "nep", "build-1", "story_points", "5", "Compile Time", "1h 30m", "lines", "12500"],
        None,
    );
    assert!(
        output.status.success(),
        "task update should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output), "Task updated\n");
    assert!(temp.path().join("data/maxify.db").exists());

    let output = mx(temp.path(), &["task", "NEP", "build-1"], None);
    assert!(output.status.success());
    let printed = stdout(&output);
    assert!(printed.starts_with("Task: build-1\nCreated: "));
    assert!(printed.contains(" Compile Time -> 1:30:00\n"));
    assert!(printed.contains(" Lines -> 12,500\n"));
    assert!(printed.contains(" Story Points -> 5\n"));
}

#[test]
fn test_rejected_batch_leaves_task_untouched() {
    let temp = TempDir::new().unwrap();

    let output = mx(temp.path(), &["task", "nep", "build-1", "Story Points", "5"], None);
    assert!(output.status.success());

    let output = mx(
        temp.path(),
        &["task", "nep", "build-1", "Compile Time", "2h", "Story Points", "4"],
        None,
    );
    assert!(!output.status.success(), "out-of-range value should fail");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("4 is not a legal value for Story Points")
    );

    let printed = stdout(&mx(temp.path(), &["task", "nep", "build-1"], None));
    assert!(printed.contains(" Story Points -> 5\n"));
    assert!(!printed.contains("Compile Time"));
}

#[test]
fn test_invalid_project_is_skipped() {
    let temp = TempDir::new().unwrap();

    let output = mx(temp.path(), &["projects"], None);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Projects\n--------\n* NEP (nickname: nep) -> NEP project\n"
    );

    let output = mx(temp.path(), &["metrics", "Broken"], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No project found named 'Broken'"));
}

#[test]
fn test_parse_infers_unit() {
    let temp = TempDir::new().unwrap();

    let output = mx(temp.path(), &["parse", "3 days, 2 hours"], None);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Duration: 3 days, 2:00:00 (266400s)\n");

    let output = mx(temp.path(), &["parse", "1234567", "--unit", "Int"], None);
    assert_eq!(stdout(&output), "Int: 1,234,567 (1234567)\n");
}

#[test]
fn test_shell_session() {
    let temp = TempDir::new().unwrap();

    let output = mx(
        temp.path(),
        &[],
        Some("project nep\ntask build-2 story_points 8 'Compile Time' 45m\nbuild-2\nquit\n"),
    );
    assert!(output.status.success());
    let printed = stdout(&output);
    assert!(printed.starts_with("Maxify programmer time tracker client\n"));
    assert!(printed.contains("> Switched to project 'NEP'\n"));
    assert!(printed.contains("> Task updated\n"));
    assert!(printed.contains(" Compile Time -> 0:45:00\n"));
    assert!(printed.contains(" Story Points -> 8\n"));

    // The shell writes through to the same database as the task command.
    let printed = stdout(&mx(temp.path(), &["task", "nep", "build-2"], None));
    assert!(printed.contains(" Story Points -> 8\n"));
}

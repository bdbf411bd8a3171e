//! Integration tests for the sonardev CLI

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;

use tempfile::tempdir;

fn run_sonardev(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-p", "sonardev", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

// Mirrors the classic fixture for this kind of cleanup: heavy indentation,
// a line whose interior spacing must survive, and a whitespace-only line.
const INDENTED: &str = "         many spaces before\n   white spaces should be  kept  in   the   line   \n            \nlast line\n";

fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let one = dir.join("whitespace-indented-1.txt");
    let two = dir.join("whitespace-indented-2.txt");
    fs::write(&one, INDENTED).unwrap();
    fs::write(&two, INDENTED).unwrap();
    (one, two)
}

fn assert_trimmed(path: &Path) {
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("many spaces"));
    assert!(!content.contains("            "));
    assert!(content.contains("white spaces should be  kept  in   the   line"));
}

fn assert_not_trimmed(path: &Path) {
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("         many spaces"));
    assert!(content.contains("            "));
}

/// Accept one request on a random loopback port and answer with the given
/// response head.
fn serve_once(response: &'static str) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
    });
    (format!("http://{addr}"), handle)
}

const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n";
const SERVER_ERROR: &str =
    "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

fn make_server_home(root: &Path) -> PathBuf {
    let home = root.join("sonarqube");
    fs::create_dir_all(home.join("conf")).unwrap();
    fs::write(home.join("conf/sonar.properties"), "sonar.web.port=9000\n").unwrap();
    home
}

fn make_artifact(root: &Path) -> PathBuf {
    let jar = root.join("my-plugin-1.0.jar");
    fs::write(&jar, b"jar bytes").unwrap();
    jar
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_sonardev(&["--help"]);

    assert!(success);
    assert!(stdout.contains("sonardev"));
    assert!(stdout.contains("upload"));
    assert!(stdout.contains("trim"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_sonardev(&["--version"]);

    assert!(success);
    assert!(stdout.contains("sonardev"));
}

#[test]
fn test_trim_help() {
    let (stdout, _, success) = run_sonardev(&["trim", "--help"]);

    assert!(success);
    assert!(stdout.contains("--include"));
    assert!(stdout.contains("--exclude"));
    assert!(stdout.contains("--output"));
}

#[test]
fn test_trim_all_files() {
    let dir = tempdir().unwrap();
    let (one, two) = write_fixtures(dir.path());

    let (stdout, _, success) = run_sonardev(&["trim", dir.path().to_str().unwrap()]);

    assert!(success);
    assert!(stdout.contains("2 rewritten"));
    assert_trimmed(&one);
    assert_trimmed(&two);
}

#[test]
fn test_trim_with_include() {
    let dir = tempdir().unwrap();
    let (one, two) = write_fixtures(dir.path());

    let (_, _, success) = run_sonardev(&[
        "trim",
        dir.path().to_str().unwrap(),
        "--include",
        "**/*-1.txt",
    ]);

    assert!(success);
    assert_trimmed(&one);
    assert_not_trimmed(&two);
}

#[test]
fn test_trim_with_exclude() {
    let dir = tempdir().unwrap();
    let (one, two) = write_fixtures(dir.path());

    let (_, _, success) = run_sonardev(&[
        "trim",
        dir.path().to_str().unwrap(),
        "--exclude",
        "**/*-1.txt",
    ]);

    assert!(success);
    assert_not_trimmed(&one);
    assert_trimmed(&two);
}

#[test]
fn test_trim_is_idempotent() {
    let dir = tempdir().unwrap();
    let (one, _) = write_fixtures(dir.path());

    let (_, _, first) = run_sonardev(&["trim", dir.path().to_str().unwrap()]);
    let after_first = fs::read_to_string(&one).unwrap();
    let (stdout, _, second) = run_sonardev(&["trim", dir.path().to_str().unwrap()]);

    assert!(first);
    assert!(second);
    assert!(stdout.contains("2 unchanged"));
    assert_eq!(fs::read_to_string(&one).unwrap(), after_first);
}

#[test]
fn test_trim_json_output() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());

    let (stdout, _, success) =
        run_sonardev(&["trim", dir.path().to_str().unwrap(), "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let results = parsed["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r["outcome"] == serde_json::json!("rewritten")));
}

#[test]
fn test_trim_missing_directory() {
    let (_, stderr, success) = run_sonardev(&["trim", "/nonexistent/path"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("path does not exist"));
}

#[test]
fn test_trim_invalid_pattern() {
    let dir = tempdir().unwrap();

    let (_, stderr, success) = run_sonardev(&[
        "trim",
        dir.path().to_str().unwrap(),
        "--include",
        "[invalid",
    ]);

    assert!(!success);
    assert!(stderr.contains("invalid glob pattern"));
}

#[test]
fn test_upload_missing_server_home() {
    let dir = tempdir().unwrap();
    let artifact = make_artifact(dir.path());

    let (_, stderr, success) = run_sonardev(&[
        "upload",
        "--server-home",
        dir.path().join("absent").to_str().unwrap(),
        "--artifact",
        artifact.to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("server home directory does not exist"));
}

#[test]
fn test_upload_missing_artifact_has_no_side_effects() {
    let dir = tempdir().unwrap();
    let home = make_server_home(dir.path());

    let (_, stderr, success) = run_sonardev(&[
        "upload",
        "--server-home",
        home.to_str().unwrap(),
        "--artifact",
        dir.path().join("absent.jar").to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("plugin artifact does not exist"));
    assert!(!home.join("extensions").exists());
}

#[test]
fn test_upload_and_restart() {
    let (url, handle) = serve_once(NO_CONTENT);
    let dir = tempdir().unwrap();
    let home = make_server_home(dir.path());
    let artifact = make_artifact(dir.path());

    let (stdout, _, success) = run_sonardev(&[
        "upload",
        "-s",
        home.to_str().unwrap(),
        "-a",
        artifact.to_str().unwrap(),
        "-u",
        &url,
    ]);
    handle.join().unwrap();

    assert!(success);
    assert!(stdout.contains("staged at"));
    let staged = home.join("extensions/downloads/my-plugin-1.0.jar");
    assert_eq!(fs::read(staged).unwrap(), b"jar bytes");
}

#[test]
fn test_upload_restart_rejected_keeps_artifact() {
    let (url, handle) = serve_once(SERVER_ERROR);
    let dir = tempdir().unwrap();
    let home = make_server_home(dir.path());
    let artifact = make_artifact(dir.path());

    let (_, stderr, success) = run_sonardev(&[
        "upload",
        "-s",
        home.to_str().unwrap(),
        "-a",
        artifact.to_str().unwrap(),
        "-u",
        &url,
    ]);
    handle.join().unwrap();

    assert!(!success);
    assert!(stderr.contains("refused to restart"));
    assert!(home.join("extensions/downloads/my-plugin-1.0.jar").is_file());
}

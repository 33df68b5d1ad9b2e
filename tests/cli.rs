//! Integration tests for the `backpack` binary.
//!
//! Downloads only ever go to a throwaway server on 127.0.0.1, pointed at
//! through a `backpack.toml` in the test directory.

use std::fs;
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use zip::write::FileOptions;

fn run_backpack(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_backpack"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .output()
        .expect("Failed to run backpack")
}

fn output_text(output: &Output) -> String {
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A URL on a local port nobody listens on.
fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/master.zip", addr)
}

/// Serve a minimal template archive for a single request.
fn serve_template() -> String {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default();
    zip.start_file("BackPack-Installer-master/composer.json", options)
        .unwrap();
    zip.write_all(br#"{"name": "foxted/backpack", "autoload": {"BackPack\\": "src"}}"#)
        .unwrap();
    zip.start_file("BackPack-Installer-master/src/Package.php", options)
        .unwrap();
    zip.write_all(b"<?php\n").unwrap();
    let body = zip.finish().unwrap().into_inner();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });
    format!("http://{}/master.zip", addr)
}

/// Template from `url`, composer replaced by a shell that prints one line.
fn write_config(dir: &Path, url: &str) {
    let config = format!(
        r#"[template]
url = "{}"

[installer]
program = "sh"
commands = [["-c", "echo relayed-line"]]
"#,
        url
    );
    fs::write(dir.join("backpack.toml"), config).unwrap();
}

#[test]
fn test_existing_directory_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("demo")).unwrap();
    fs::write(dir.path().join("demo/index.php"), "<?php").unwrap();

    let output = run_backpack(dir.path(), &["new", "demo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output_text(&output).contains("Package already exists!"));

    let mut names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names, vec!["demo"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("demo/index.php")).unwrap(),
        "<?php"
    );
}

#[test]
fn test_invalid_namespace_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_backpack(dir.path(), &["new", "demo", "--namespace", "Acme/Blog"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output_text(&output).contains("not a valid namespace"));
    assert!(!dir.path().join("demo").exists());
}

#[test]
fn test_invalid_name_exits_with_two() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_backpack(dir.path(), &["new", "../escape"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output_text(&output).contains("not a valid package name"));
}

#[test]
fn test_missing_name_without_terminal_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_backpack(dir.path(), &["new"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output_text(&output).contains("package name is required"));
}

#[test]
fn test_broken_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("backpack.toml"), "[template\n").unwrap();

    let output = run_backpack(dir.path(), &["new", "demo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output_text(&output).contains("backpack.toml"));
    assert!(!dir.path().join("demo").exists());
}

#[test]
fn test_no_subcommand_prints_usage_hint() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_backpack(dir.path(), &[]);

    assert!(output.status.success());
    assert!(output_text(&output).contains("backpack new"));
}

#[test]
fn test_completion_script_generated() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_backpack(dir.path(), &["completion", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("backpack"));
}

#[test]
fn test_download_failure_exits_with_three() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &unreachable_url());

    let output = run_backpack(dir.path(), &["new", "demo"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Preparing package"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Download failed"));
    assert_eq!(entries(dir.path()), vec!["backpack.toml"]);
}

#[test]
fn test_quiet_only_prints_the_error() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &unreachable_url());

    let output = run_backpack(dir.path(), &["-q", "new", "demo"]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Download failed"));
}

#[cfg(unix)]
#[test]
fn test_installer_output_is_relayed() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &serve_template());

    let output = run_backpack(dir.path(), &["new", "demo", "--namespace", "Acme"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "{}", output_text(&output));
    assert!(stdout.contains("$ sh -c echo relayed-line"));
    assert!(stdout.lines().any(|line| line == "relayed-line"));
    assert!(stdout.contains("Package ready!"));

    assert_eq!(entries(dir.path()), vec!["backpack.toml", "demo"]);
    let manifest = fs::read_to_string(dir.path().join("demo/composer.json")).unwrap();
    assert!(manifest.contains(r#""Acme\\": "src""#));
}

#[cfg(unix)]
#[test]
fn test_quiet_run_hides_installer_output() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &serve_template());

    let output = run_backpack(dir.path(), &["--quiet", "new", "demo"]);

    assert_eq!(output.status.code(), Some(0), "{}", output_text(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "");
    assert!(dir.path().join("demo/src/Package.php").is_file());
}

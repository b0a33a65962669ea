use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::str;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// The binary against an isolated configuration file and working directory
fn command(workdir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_secretsctl"));
    command
        .arg("--configuration")
        .arg(workdir.join("config.toml"))
        .arg("--quiet")
        .args(args)
        .current_dir(workdir)
        .env("HOME", workdir)
        .env_remove("SECRETSCTL_TOKEN")
        .env_remove("SECRETSCTL_PROJECT")
        .env_remove("SECRETSCTL_API_HOST")
        .env_remove("RUST_LOG");
    command
}

fn secretsctl(workdir: &Path, args: &[&str]) -> Output {
    command(workdir, args).output().expect("Failed to execute secretsctl")
}

/// Answer one connection per canned body with 200 and return each request line
fn stub_api(bodies: Vec<&'static str>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        bodies
            .into_iter()
            .map(|body| {
                let (mut stream, _) = listener.accept().unwrap();
                let request_line = read_request_line(&mut stream);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                request_line
            })
            .collect()
    });

    (host, handle)
}

// Reads the full request (headers and Content-Length body) and returns its first line.
fn read_request_line(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.trim().parse::<usize>().unwrap())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    head.lines().next().unwrap_or_default().to_string()
}

fn stdout(output: &Output) -> &str {
    str::from_utf8(&output.stdout).expect("Invalid UTF-8")
}

fn stderr(output: &Output) -> &str {
    str::from_utf8(&output.stderr).expect("Invalid UTF-8")
}

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["--help"]);

        assert!(output.status.success());
        let stdout = stdout(&output);
        assert!(stdout.contains("Usage:"));
        assert!(stdout.contains("projects"));
        assert!(stdout.contains("configure"));
    }

    #[test]
    fn test_cli_projects_help() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["projects", "--help"]);

        assert!(output.status.success());
        let stdout = stdout(&output);
        for verb in ["get", "create", "update", "delete"] {
            assert!(stdout.contains(verb), "missing {verb} in help");
        }
        assert!(stdout.contains("--json"));
    }

    #[test]
    fn test_cli_version() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["--version"]);

        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_invalid_command() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["invalid-command"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("error"));
    }

    #[test]
    fn test_missing_token_is_resolution_error() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["projects"]);

        assert_eq!(output.status.code(), Some(3));
        assert!(stdout(&output).is_empty());
        assert!(stderr(&output).contains("SECRETSCTL_TOKEN"));
    }

    #[test]
    fn test_update_without_flags_fails_before_request() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(
            dir.path(),
            &["--token", "st_test", "--api-host", "http://127.0.0.1:9", "projects", "update", "web"],
        );

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("required flag(s) \"name\", \"description\" not set"));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_update_without_flags_reported_before_token() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["projects", "update", "web"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("required flag(s) \"name\", \"description\" not set"));
        assert!(!stderr(&output).contains("SECRETSCTL_TOKEN"));
    }

    #[test]
    fn test_create_without_name_reported_before_token() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(dir.path(), &["projects", "create"]);

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("required flag(s) \"name\" not set"));
    }

    #[test]
    fn test_delete_with_piped_stdin_skips_prompt() {
        let dir = TempDir::new().unwrap();
        let (host, server) = stub_api(vec![
            "",
            r#"{"projects":[{"id":"api","name":"API","description":"","setup_at":"","created_at":""}]}"#,
        ]);

        let mut child = command(
            dir.path(),
            &["--token", "st_test", "--api-host", &host, "projects", "delete", "web"],
        )
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn secretsctl");
        // A "no" on a pipe is never read: only a terminal gets the prompt.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(b"n\n");
        }
        let output = child.wait_with_output().unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(!stderr(&output).contains("(y/N)"));
        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("DELETE /v3/projects/project "));
        assert!(requests[1].starts_with("GET /v3/projects "));

        let stdout = stdout(&output);
        assert_eq!(stdout.lines().count(), 2);
        assert!(stdout.contains("api"));
    }

    #[test]
    fn test_get_without_project_fails_before_request() {
        let dir = TempDir::new().unwrap();
        let output = secretsctl(
            dir.path(),
            &["--token", "st_test", "--api-host", "http://127.0.0.1:9", "projects", "get"],
        );

        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("No project specified"));
    }

    #[test]
    fn test_configure_set_then_show() {
        let dir = TempDir::new().unwrap();
        let scope = dir.path().to_string_lossy().into_owned();

        let set = secretsctl(
            dir.path(),
            &["--scope", &scope, "configure", "set", "token=st_abcdefgh", "project=web"],
        );
        assert!(set.status.success(), "stderr: {}", stderr(&set));
        assert!(dir.path().join("config.toml").exists());

        let show = secretsctl(dir.path(), &["--scope", &scope, "configure", "--json"]);
        assert!(show.status.success(), "stderr: {}", stderr(&show));

        let rows: serde_json::Value = serde_json::from_str(stdout(&show)).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "token");
        assert_eq!(rows[0]["value"], "st_abcdefgh");
        assert!(rows[0]["source"].as_str().unwrap().starts_with("config file"));
        assert_eq!(rows[1]["value"], "web");
        assert_eq!(rows[2]["source"], "default");
    }

    #[test]
    fn test_configure_table_masks_token() {
        let dir = TempDir::new().unwrap();
        let scope = dir.path().to_string_lossy().into_owned();

        let set = secretsctl(dir.path(), &["--scope", &scope, "configure", "set", "token=st_abcdefgh"]);
        assert!(set.status.success(), "stderr: {}", stderr(&set));

        let show = secretsctl(dir.path(), &["--scope", &scope, "configure"]);
        let stdout = stdout(&show);
        assert!(show.status.success());
        assert!(stdout.contains("st_abc…"));
        assert!(!stdout.contains("st_abcdefgh"));
    }

    #[test]
    fn test_configure_unset_removes_setting() {
        let dir = TempDir::new().unwrap();
        let scope = dir.path().to_string_lossy().into_owned();

        secretsctl(dir.path(), &["--scope", &scope, "configure", "set", "project=web"]);
        let unset = secretsctl(dir.path(), &["--scope", &scope, "configure", "unset", "project"]);
        assert!(unset.status.success(), "stderr: {}", stderr(&unset));

        let show = secretsctl(dir.path(), &["--scope", &scope, "configure", "--json"]);
        let rows: serde_json::Value = serde_json::from_str(stdout(&show)).unwrap();
        assert_eq!(rows[1]["source"], "unset");
    }
}

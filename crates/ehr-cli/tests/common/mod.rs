use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Fixed transaction time so runs are reproducible.
pub const TX_TIME: &str = "2024-01-02T03:04:05.678Z";

fn command(args: &[&str], state_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ehr"));
    cmd.args(args);
    cmd.env("EHR_STATE_DIR", state_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the CLI against an isolated ledger directory.
pub fn run_cli(args: &[&str], state_dir: &Path) -> Output {
    command(args, state_dir)
        .output()
        .expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], state_dir: &Path) -> String {
    let output = run_cli(args, state_dir);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI with `input` piped to stdin.
pub fn run_cli_with_stdin(args: &[&str], state_dir: &Path, input: &str) -> Output {
    let mut cmd = command(args, state_dir);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().expect("Failed to spawn CLI");
    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("Failed to write to stdin");
    }
    child.wait_with_output().expect("Failed to wait for CLI")
}

/// JSON for a record with the given id and name.
pub fn record_json(id: &str, name: &str) -> String {
    serde_json::json!({
        "id": id,
        "textData": "",
        "name": name,
        "size": "100 kB",
        "doc": false,
        "fileType": "",
        "fileName": "",
        "base64String": ""
    })
    .to_string()
}

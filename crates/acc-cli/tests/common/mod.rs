use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary with an isolated data directory and no client
/// configuration inherited from the caller's environment.
pub fn run_cli(args: &[&str], data_dir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_acc"));
    cmd.args(args);
    cmd.env("ACC_DATA_DIR", data_dir);
    for var in [
        "ACC_CLIENT_ID",
        "ACC_CLIENT_SECRET",
        "ACC_REDIRECT_URI",
        "ACC_API_BASE",
        "ACC_REGION",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], data_dir: &Path) -> String {
    let output = run_cli(args, data_dir);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
#[allow(dead_code)]
pub fn run_cli_failure(args: &[&str], data_dir: &Path) -> String {
    let output = run_cli(args, data_dir);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

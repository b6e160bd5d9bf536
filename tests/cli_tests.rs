//! CLI smoke tests against the built binary. None of these reach a node or
//! take over the terminal: each case fails or exits before the dashboard starts.

mod common;

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: bitui [OPTIONS] <URL>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
    for flag in ["--chain", "--username", "--cookie", "--data-dir", "--blocks"] {
        assert!(result.stdout.contains(flag), "missing {flag}");
    }
}

#[test]
fn version_flag_prints_version() {
    let result = common::run_cli_case("version_flag_prints_version", &["--version"]);
    assert!(result.status.success());
    assert!(
        result.stdout.contains(env!("CARGO_PKG_VERSION")),
        "log: {}",
        result.log_path.display()
    );
}

#[test]
fn invalid_chain_is_rejected() {
    let result = common::run_cli_case(
        "invalid_chain_is_rejected",
        &["http://127.0.0.1:18443", "--chain", "mainnet"],
    );
    assert!(!result.status.success());
    assert!(result.stderr.contains("mainnet"), "log: {}", result.log_path.display());
}

#[test]
fn non_http_url_exits_with_user_error() {
    let result = common::run_cli_case("non_http_url_exits_with_user_error", &["127.0.0.1:18443"]);
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.starts_with("bitui: "));
}

#[test]
fn missing_explicit_config_exits_with_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let missing_arg = missing.to_string_lossy().to_string();
    let result = common::run_cli_case(
        "missing_explicit_config_exits_with_user_error",
        &["http://127.0.0.1:18443", "--config", &missing_arg],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("BUI-3002"));
}

#[test]
fn missing_cookie_exits_with_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bitui.toml");
    std::fs::write(&config, "").unwrap();
    let config_arg = config.to_string_lossy().to_string();
    let data_arg = dir.path().to_string_lossy().to_string();
    let log_arg = dir.path().join("s.jsonl").to_string_lossy().to_string();
    let result = common::run_cli_case(
        "missing_cookie_exits_with_runtime_error",
        &[
            "http://127.0.0.1:18443",
            "--config",
            &config_arg,
            "-C",
            "-d",
            &data_arg,
            "--log-file",
            &log_arg,
        ],
    );
    assert_eq!(result.status.code(), Some(2), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("BUI-3101"));
    // The session log records the start and the failure.
    let log = std::fs::read_to_string(dir.path().join("s.jsonl")).unwrap();
    assert!(log.contains("session_start"));
    assert!(log.contains("BUI-3101"));
}

use depinambour_util::errors::DepError;
use depinambour_util::process::CommandBuilder;

#[test]
fn test_builder_display() {
    let cmd = CommandBuilder::new("go").args(["mod", "graph"]);
    assert_eq!(cmd.display(), "go mod graph");
}

#[test]
fn test_builder_nonexistent_program() {
    let result = CommandBuilder::new("nonexistent_program_xyz_123").exec();
    assert!(matches!(result, Err(DepError::ExternalCommand { .. })));
}

#[cfg(unix)]
#[test]
fn test_exec_stdout_captures_output() {
    let out = CommandBuilder::new("echo")
        .args(["app", "lib@v1.0.0"])
        .exec_stdout()
        .unwrap();
    assert_eq!(out.trim(), "app lib@v1.0.0");
}

#[cfg(unix)]
#[test]
fn test_exec_stdout_with_env() {
    let out = CommandBuilder::new("sh")
        .arg("-c")
        .arg("echo $DEPINAMBOUR_TEST_VAR")
        .env("DEPINAMBOUR_TEST_VAR", "value")
        .exec_stdout()
        .unwrap();
    assert_eq!(out.trim(), "value");
}

#[cfg(unix)]
#[test]
fn test_exec_stdout_with_cwd() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("go.mod"), "module x\n").unwrap();

    let out = CommandBuilder::new("ls")
        .cwd(tmp.path().to_str().unwrap())
        .exec_stdout()
        .unwrap();
    assert!(out.contains("go.mod"));
}

#[cfg(unix)]
#[test]
fn test_exec_stdout_failure_includes_stderr() {
    let err = CommandBuilder::new("sh")
        .arg("-c")
        .arg("echo 'go: no go.mod' >&2; exit 1")
        .exec_stdout()
        .unwrap_err();
    match err {
        DepError::ExternalCommand { message } => {
            assert!(message.contains("go: no go.mod"), "got: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

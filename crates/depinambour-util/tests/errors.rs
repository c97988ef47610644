use depinambour_util::errors::DepError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = DepError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_parse_error_display() {
    let err = DepError::Parse {
        name: "lib@vX".to_string(),
        message: "unexpected character".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot parse module 'lib@vX': unexpected character"
    );
}

#[test]
fn test_external_command_error_display() {
    let err = DepError::ExternalCommand {
        message: "exit status: 1".to_string(),
    };
    assert_eq!(err.to_string(), "Module graph command failed: exit status: 1");
}

#[test]
fn test_unknown_module_error_display() {
    let err = DepError::UnknownModule {
        name: "example.com/app".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Module 'example.com/app' is not in the module graph"
    );
}

#[test]
fn test_config_error_display() {
    let err = DepError::Config {
        message: "bad toml".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad toml");
}

#[test]
fn test_parse_error_has_help() {
    use miette::Diagnostic;
    let err = DepError::Parse {
        name: "x@".to_string(),
        message: "empty version".to_string(),
    };
    let help = err.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("path@v1.2.3"), "got: {help}");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: DepError = io_err.into();
    assert!(matches!(err, DepError::Io(_)));
}

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depinambour operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A module name could not be split into path and version, or its
    /// version is not valid semantic-version syntax.
    #[error("Cannot parse module '{name}': {message}")]
    #[diagnostic(help("Module names look like `path` or `path@v1.2.3`"))]
    Parse { name: String, message: String },

    /// The module-graph producer failed to run or its output was unusable.
    #[error("Module graph command failed: {message}")]
    #[diagnostic(help("Run the command by hand (default: `go mod graph`) to see what went wrong"))]
    ExternalCommand { message: String },

    /// A module was requested by name but is not part of the graph.
    #[error("Module '{name}' is not in the module graph")]
    UnknownModule { name: String },

    /// Global configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

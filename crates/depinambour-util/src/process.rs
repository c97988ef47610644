use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Output};

use crate::errors::DepError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments, environment variables, and working directory.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The command line as a single display string, e.g. `go mod graph`.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and return its raw output, whatever the exit status.
    pub fn exec(&self) -> Result<Output, DepError> {
        tracing::debug!(command = %self.display(), cwd = ?self.cwd, "spawning");
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(Path::new(dir));
        }
        cmd.output().map_err(|e| DepError::ExternalCommand {
            message: format!("cannot run `{}`: {e}", self.display()),
        })
    }

    /// Execute the command and return its stdout as text.
    ///
    /// A non-zero exit status or non-UTF-8 output is an
    /// [`DepError::ExternalCommand`]; stderr is included in the message.
    pub fn exec_stdout(&self) -> Result<String, DepError> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DepError::ExternalCommand {
                message: format!(
                    "`{}` exited with {}: {}",
                    self.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| DepError::ExternalCommand {
            message: format!("`{}` produced non-UTF-8 output: {e}", self.display()),
        })
    }
}

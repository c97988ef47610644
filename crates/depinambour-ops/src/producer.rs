//! Sources of module graph edge lines.

use std::io::Read;
use std::path::PathBuf;

use depinambour_core::config::ProducerConfig;
use depinambour_util::errors::DepError;
use depinambour_util::process::CommandBuilder;
use depinambour_util::progress;

/// Where the `<parent> <child>` lines come from.
#[derive(Debug, Clone)]
pub enum EdgeSource {
    /// Run the configured producer (`go mod graph` by default) in a directory.
    Command {
        producer: ProducerConfig,
        dir: PathBuf,
    },
    /// Read previously captured producer output from a file.
    File(PathBuf),
    /// Read producer output from standard input.
    Stdin,
}

impl EdgeSource {
    /// Interpret a `--input` value: `-` means stdin, anything else is a file path.
    pub fn from_input(input: &str) -> Self {
        if input == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(input))
        }
    }
}

/// Read the full producer output as text.
pub fn read_edges(source: &EdgeSource) -> Result<String, DepError> {
    match source {
        EdgeSource::Command { producer, dir } => {
            let cmd = CommandBuilder::new(&producer.program)
                .args(&producer.args)
                .cwd(dir.to_string_lossy());
            let pb = progress::spinner(&format!("Running `{}`", cmd.display()));
            let result = cmd.exec_stdout();
            pb.finish_and_clear();
            result
        }
        EdgeSource::File(path) => Ok(std::fs::read_to_string(path)?),
        EdgeSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

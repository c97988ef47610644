//! Command dispatch.

use miette::Result;

use depinambour_core::config::GlobalConfig;
use depinambour_ops::ops_audit::{self, AuditOptions};
use depinambour_ops::producer::EdgeSource;
use depinambour_util::errors::DepError;

use crate::cli::Cli;

/// Route a parsed CLI invocation to the audit operation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = GlobalConfig::load()?;
    tracing::debug!(?config, "loaded configuration");

    let source = match cli.input.as_deref() {
        Some(input) => EdgeSource::from_input(input),
        None => {
            let dir = match cli.dir {
                Some(dir) => dir,
                None => std::env::current_dir().map_err(DepError::Io)?,
            };
            EdgeSource::Command {
                producer: config.producer.clone(),
                dir,
            }
        }
    };

    let opts = AuditOptions {
        reference: cli.reference,
        source,
        root: cli.root,
        color: cli.color.map(Into::into).unwrap_or(config.display.color),
    };

    ops_audit::run(&opts)
}

//! Process plumbing shared by the binaries.

use crate::config::{Configuration, Invocation};
use core::fmt::Display;

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_nanos()
        .init();
}

/// Read the configuration from the process arguments. Prints usage and
/// returns `None` when help was requested.
pub fn configure<C: Configuration>() -> Result<Option<C>, anyhow::Error> {
    match C::from_args(std::env::args().skip(1))? {
        Invocation::Run(config) => Ok(Some(config)),
        Invocation::Help => {
            println!("{}", C::USAGE);
            Ok(None)
        }
    }
}

/// Runtime failures are not recovered from.
pub fn fatal(what: &str, error: impl Display) -> ! {
    log::error!("{} failed: {}", what, error);
    std::process::exit(1)
}

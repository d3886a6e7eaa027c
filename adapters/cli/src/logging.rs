//! Global logging backend.

use std::{env, io};

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Default logging environment filter. Simulation crates log at info, everything else at warn.
const DEFAULT_FILTER: &str = "warn,wizard_duel_world=info,wizard_duel_cli=info";

/// Installs a compact `tracing` backend writing to stderr. Accepts
/// ecosystem-standard `RUST_LOG` filters, which take precedence over the defaults.
pub(crate) fn init_logging() -> Result<()> {
    let format = fmt::format().compact().with_line_number(true);
    let stderr_log = fmt::layer().event_format(format).with_writer(io::stderr);

    let filter = filter_directives(env::var(EnvFilter::DEFAULT_ENV).ok());
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stderr_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to install log subscriber")
}

fn filter_directives(env_filter: Option<String>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter.filter(|directives| !directives.is_empty()) {
        filter.push(',');
        filter.push_str(&env_filter);
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_directives_are_appended() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some(String::new())), DEFAULT_FILTER);
        assert_eq!(
            filter_directives(Some("wizard_duel_world=trace".to_owned())),
            format!("{DEFAULT_FILTER},wizard_duel_world=trace")
        );
    }
}

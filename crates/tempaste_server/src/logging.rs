//! Tracing subscriber setup for the server binary.

use anyhow::Context;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tempaste_core::Config;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

const DEFAULT_FILTER: &str = "tempaste=warn,tempaste_server=warn,tempaste_core=warn,tower_http=warn";
const VERBOSE_FILTER: &str = "tempaste=info,tempaste_server=info,tempaste_core=info,tower_http=info";

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to `config.log_file` (appending) when set, otherwise stdout, as
/// JSON lines when `config.log_json` is set. `RUST_LOG` overrides the
/// default filter.
///
/// # Errors
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.verbose)));

    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if config.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(config.log_file.is_none())
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_levels() {
        assert!(default_filter(false).contains("tempaste_core=warn"));
        assert!(default_filter(true).contains("tempaste_core=info"));
        assert!(default_filter(true).contains("tower_http=info"));
    }

    #[test]
    fn default_filters_parse() {
        for verbose in [false, true] {
            EnvFilter::try_new(default_filter(verbose)).expect("valid directives");
        }
    }
}

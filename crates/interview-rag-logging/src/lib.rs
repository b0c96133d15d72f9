//! Session logging for interview-rag.
//!
//! Two channels run side by side. [`Logger`] prints one typed [`LogEvent`]
//! per pipeline step for whoever sits at the terminal, in the [`LogFormat`]
//! picked on the command line. `tracing` carries diagnostics from every
//! crate and is installed once by [`init_tracing`].
//!
//! Both write to stderr so stdout stays clean for answers and `--json-output`.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global diagnostics subscriber.
///
/// `RUST_LOG` takes precedence over `level`; an unparsable level falls back
/// to `warn`. A second call is a no-op.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(layer).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing("not a level!!", LogFormat::Compact);
        init_tracing("debug", LogFormat::Json);
    }
}

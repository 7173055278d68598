use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Install the global subscriber. Logs go to stderr; stdout carries command
/// output and the MCP transport. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: u8, format: LogFormat) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,pdfpages={}", level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

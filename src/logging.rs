//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Log level for the crate given `-v` count and `-q`
pub fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialise logging to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags, e.g.
/// `RUST_LOG=table_dep_graph=debug`.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("table_dep_graph={}", default_level(verbose, quiet)))
    });

    // A subscriber may already be set when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

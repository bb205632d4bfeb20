// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// The per-link progress lines and the summary are normal program output and
// go through the Reporter. Log records are for diagnostics only: which HTTP
// method was tried, why a fallback happened, which command was run.
//
// Levels:
//   -q         nothing
//   (default)  warnings and errors
//   -v         debug, including every probe attempt
// -v and -q always win. Without either flag, RUST_LOG (when set) decides,
// so RUST_LOG=linkpage=trace works as usual.
// =============================================================================

use log::{debug, LevelFilter};

// The level to force, or None when RUST_LOG should be left in charge
pub fn level_for(verbose: bool, quiet: bool, rust_log_set: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if verbose {
        Some(LevelFilter::Debug)
    } else if rust_log_set {
        None
    } else {
        Some(LevelFilter::Warn)
    }
}

/// Initializes env_logger; call once at startup
pub fn init_logger(verbose: bool, quiet: bool) {
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let level = level_for(verbose, quiet, rust_log_set);

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(false).init();

    match level {
        Some(level) => debug!("Logger initialized with level: {level:?}"),
        None => debug!("Logger initialized from RUST_LOG"),
    }
}

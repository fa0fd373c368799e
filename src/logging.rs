//! Logging setup for the `dsforge` binary.
//!
//! The library only talks to the [`log`] facade. The binary installs
//! [`env_logger`] with `info` as the default level in debug builds and `warn`
//! in release builds; `RUST_LOG` overrides both:
//!
//! ```sh
//! $> RUST_LOG=dsforge=trace dsforge import src/orders.rpgle --line 12
//! ```

/// Installs the logger. `verbose` raises the default level to `debug`.
pub fn init(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    let filter = format!("{}={}", env!("CARGO_CRATE_NAME"), level.as_str().to_lowercase());

    // try_init so repeated calls from tests do not panic.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init();
}

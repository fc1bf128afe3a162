//! Diagnostic logging for the simulator. Log messages describe what the engine is doing while
//! it runs. This is not to be confused with _recording_ (see [`crate::report`]), which
//! produces the event log that is the artifact of a run.
//!
//! This module (re)exports the five logging macros: `error!`, `warn!`, `info!`, `debug!` and
//! `trace!`. The engine logs at `info` when a run starts and ends, at `debug` once per step,
//! and at `trace` for every interaction and every resolved infection.
//!
//! Logging is _disabled_ by default. The command line option `--log-level` takes a comma
//! separated list of entries: a bare level sets the global level and `module=level` sets the
//! level for one module path, e.g. `--log-level info,herd::simulation=trace`. The same can be
//! done programmatically:
//!
//! ```rust
//! use herd::log::{set_module_filter, set_log_level, LevelFilter};
//!
//! pub fn setup_logging() {
//!     set_log_level(LevelFilter::Info);
//!     // Show each step's counters, but not every interaction.
//!     set_module_filter("herd::simulation", LevelFilter::Debug);
//! }
//! ```
mod standard_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};

use std::sync::{LazyLock, Mutex, MutexGuard};

use log4rs::Handle;
use rustc_hash::FxHashMap;

/// The process-wide logging configuration. log4rs installs one global logger, so every change
/// goes through this singleton and rebuilds the logger's config.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// Level for targets without their own filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    /// Level per module path, e.g. `"herd::simulation"`.
    pub(in crate::log) module_levels: FxHashMap<String, LevelFilter>,
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: LevelFilter::Off,
            module_levels: FxHashMap::default(),
            root_handle: None,
        }
    }
}

/// Enables every log message. Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level.
pub fn set_log_level(level: LevelFilter) {
    let mut log_configuration = get_log_configuration();
    log_configuration.global_log_level = level;
    log_configuration.set_config();
}

/// Sets the level for one module path, overriding the global level for it.
pub fn set_module_filter(module_path: &str, level: LevelFilter) {
    let mut log_configuration = get_log_configuration();
    let previous = log_configuration
        .module_levels
        .insert(module_path.to_string(), level);
    if previous != Some(level) {
        log_configuration.set_config();
    }
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}

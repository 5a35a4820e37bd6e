//! Logging setup and statistic output.
//!
//! Statistics are printed to stdout as `<prefix><name>=<value>` lines once [`configure`] enabled
//! them, so they can be told apart from the tour output and collected by scripts.

use std::fmt::Display;

use env_logger::Env;
use once_cell::sync::OnceCell;

static STATISTIC_OPTIONS: OnceCell<StatisticOptions> = OnceCell::new();

#[derive(Clone, Copy, Debug)]
struct StatisticOptions {
    log_statistics: bool,
    prefix: &'static str,
}

/// Configure statistic output. Only the first call has an effect.
pub fn configure(log_statistics: bool, prefix: &'static str) {
    let _ = STATISTIC_OPTIONS.set(StatisticOptions {
        log_statistics,
        prefix,
    });
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS
        .get()
        .is_some_and(|options| options.log_statistics)
}

/// Print the statistic `name` with `value` if statistics are enabled.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(options) = STATISTIC_OPTIONS.get().filter(|options| options.log_statistics) {
        println!("{}{name}={value}", options.prefix);
    }
}

/// Install the `env_logger` backend for the `log` facade. `RUST_LOG` takes precedence over the
/// default level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

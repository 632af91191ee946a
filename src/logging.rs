use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::constants::LOG_ENV_VAR;

/// Initialize the `log` facade, backed by `env_logger`.
///
/// The `verbosity_level` is the difference between `-v` and `-q` occurrences:
/// `0` is `WARN`, each step up or down moves one level. The environment variable
/// `BURROW_EXPORTER_LOG` takes precedence, if set.
pub fn init(verbosity_level: i8) {
    let default_level = level_for_verbosity(verbosity_level);

    Builder::from_env(Env::default().filter_or(LOG_ENV_VAR, default_level.as_str()))
        .format_timestamp_millis()
        .init();
}

fn level_for_verbosity(verbosity_level: i8) -> LevelFilter {
    match verbosity_level {
        i8::MIN..=-2 => LevelFilter::Off,
        -1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3..=i8::MAX => LevelFilter::Trace,
    }
}

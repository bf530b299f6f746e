use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Builds a stderr logger with the given default level; `RUST_LOG` still
/// takes precedence. Safe to call repeatedly (later calls are no-ops), which
/// keeps it usable from tests.
pub fn build_logger_for_level(level: LevelFilter) {
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).target(Target::Stderr).try_init();
}

/// Maps `-v` occurrences of a CLI onto log levels, starting at `default`.
pub fn build_logger_for_verbosity(default: LevelFilter, verbosity: usize) {
    let level = match verbosity {
        0 => default,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    build_logger_for_level(level);
}

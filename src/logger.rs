use env_logger::{Builder, Env};

/// Install the global logger. `RUST_LOG` wins over the verbosity flag.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

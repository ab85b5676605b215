use {
    crate::config::Config,
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes tracing setup that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    crate::panic_hook::install();
}

fn set_tracing_subscriber(config: &Config) {
    // Events at or above the threshold go to stderr, everything else to stdout.
    let stderr_threshold = config.stderr_threshold.unwrap_or(Level::ERROR);

    // The formatting layers differ in type so each branch builds its own
    // subscriber.
    macro_rules! fmt_layer {
        ($layer:expr) => {{
            $layer
                .with_writer(
                    std::io::stderr
                        .with_max_level(stderr_threshold)
                        .or_else(std::io::stdout),
                )
                .with_timer(UtcTime::new(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                )))
                .with_filter(EnvFilter::new(&config.env_filter))
        }};
    }

    if config.use_json_format {
        tracing_subscriber::registry()
            .with(fmt_layer!(tracing_subscriber::fmt::layer().json()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer!(tracing_subscriber::fmt::layer()))
            .init();
    }
    tracing::debug!(
        filter = %config.env_filter,
        json = config.use_json_format,
        "initialized tracing"
    );
}

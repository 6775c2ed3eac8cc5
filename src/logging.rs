// 📝 Logging - tracing subscriber with an env filter, compact or JSON output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

fn filter_for(config: &AppConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match (&config.log_level, verbose) {
            (Some(level), _) => EnvFilter::new(level),
            (None, true) => EnvFilter::new("entity_manager=debug,info"),
            (None, false) => EnvFilter::new("entity_manager=info"),
        }
    })
}

/// Install the global subscriber; later calls are ignored
pub fn init_logger(config: &AppConfig, verbose: bool) {
    let filter = filter_for(config, verbose);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("logger already initialised");
    }
}

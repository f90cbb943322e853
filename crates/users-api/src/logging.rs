use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::env_string;

const DEFAULT_FILTER: &str = "users_api=info,migration=info,sea_orm=warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `LOG_FORMAT=json` switches console output to JSON lines.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = env_string("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}

use std::env;

const LOG_VAR_NAME: &str = "RUST_LOG";

/// Starts env_logger, defaulting to `default_level` when RUST_LOG is not set.
pub fn initialise_logging(default_level: &str) {
    if env::var(LOG_VAR_NAME).is_err() {
        env::set_var(LOG_VAR_NAME, default_level)
    }
    env_logger::init();
}

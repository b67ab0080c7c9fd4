//! Logger setup for hosts that do not install their own `log` backend.

/// Install an `env_logger` backend, defaulting to `info`.
///
/// `RUST_LOG` overrides the default filter. Safe to call more than once; only
/// the first call installs a logger.
pub fn init_logging() {
    let installed = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
        .is_ok();

    if installed {
        log::debug!("tratafoto logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("still logging");
    }
}

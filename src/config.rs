use tracing::Level;

/// Optional log level: error, warn, info, debug or trace. Defaults to info.
const LOG_LEVEL_ENV: &str = "PROXY_LOG_LEVEL";
/// Optional name returned in the `Server` header of every response.
const APP_NAME_ENV: &str = "PROXY_APP_NAME";

pub(crate) struct Config {
    /// Max level for the tracing subscriber
    pub log_level: Level,
    /// Value for the `Server` response header
    pub app_name: String,
    /// Raw value of the log level env var if it could not be parsed, to be reported once logging is up
    pub invalid_log_level: Option<String>,
}

impl Config {
    pub const DEFAULT_APP_NAME: &'static str = "proxy-integration";

    /// Reads the config from env vars. Missing or invalid values are replaced with defaults.
    pub fn new() -> Self {
        Self::from_vars(std::env::var(LOG_LEVEL_ENV).ok(), std::env::var(APP_NAME_ENV).ok())
    }

    fn from_vars(log_level: Option<String>, app_name: Option<String>) -> Self {
        let (log_level, invalid_log_level) = match log_level.as_deref().map(str::trim) {
            None | Some("") => (Level::INFO, None),
            Some(v) => match v.parse::<Level>() {
                Ok(level) => (level, None),
                Err(_) => (Level::INFO, Some(v.to_owned())),
            },
        };

        let app_name = match app_name.as_deref().map(str::trim) {
            None | Some("") => Self::DEFAULT_APP_NAME.to_owned(),
            Some(v) => v.to_owned(),
        };

        Config {
            log_level,
            app_name,
            invalid_log_level,
        }
    }

    /// Logs the effective config values.
    pub fn log_summary(&self) {
        if let Some(v) = &self.invalid_log_level {
            tracing::warn!("Invalid {} value `{}`, using {}", LOG_LEVEL_ENV, v, self.log_level);
        }
        tracing::info!("Log level: {}, app name: {}", self.log_level, self.app_name);
    }
}

/// Initializes the logger with the specified level. It can be called only once per process.
pub(crate) fn init_tracing(level: Level) {
    let tsub = tracing_subscriber::fmt().with_max_level(level).with_ansi(false);
    // time is not needed in CloudWatch, but is useful in console
    #[cfg(not(debug_assertions))]
    let tsub = tsub.without_time();
    tsub.init();
}

/// Attempts to initialize logging at INFO level. It is specially useful for test
/// functions as a shortcut for logging initializing. This Fn is safe to call multiple times.
#[cfg(test)]
pub(crate) fn init_logging() {
    let tsub = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false);

    if tsub.try_init().is_ok() {
        tracing::info!("tracing_subscriber initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        init_logging();
        let config = Config::from_vars(None, None);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.app_name, Config::DEFAULT_APP_NAME);
        assert!(config.invalid_log_level.is_none());
        config.log_summary();
    }

    #[test]
    fn explicit_values() {
        let vals = vec![
            ("debug", Level::DEBUG),
            ("WARN", Level::WARN),
            (" trace ", Level::TRACE),
            ("error", Level::ERROR),
        ];
        for (raw, level) in vals {
            let config = Config::from_vars(Some(raw.to_owned()), Some(" orders-api ".to_owned()));
            assert_eq!(config.log_level, level, "for `{}`", raw);
            assert_eq!(config.app_name, "orders-api");
        }
    }

    #[test]
    fn invalid_log_level() {
        init_logging();
        let config = Config::from_vars(Some("loud".to_owned()), Some(String::new()));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.invalid_log_level.as_deref(), Some("loud"));
        assert_eq!(config.app_name, Config::DEFAULT_APP_NAME);
        config.log_summary();
    }
}

// Tue Jan 13 2026 - Alex

use log::LevelFilter;

pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "warning", "info", "debug", "trace"];

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the `env_logger` backend. A second call is ignored.
    pub fn init(level: LevelFilter, color: bool) {
        let style = if color { env_logger::WriteStyle::Auto } else { env_logger::WriteStyle::Never };

        let result = env_logger::Builder::new()
            .filter_level(level)
            .write_style(style)
            .format_timestamp(None)
            .try_init();

        if result.is_err() {
            log::debug!("logger already initialised");
        }
    }

    pub fn is_known_level(s: &str) -> bool {
        LOG_LEVELS.contains(&s.to_lowercase().as_str())
    }

    pub fn level_from_str(s: &str) -> LevelFilter {
        match s.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("DEBUG"), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_str("warning"), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_str("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn test_known_levels() {
        assert!(LoggingUtils::is_known_level("Trace"));
        assert!(!LoggingUtils::is_known_level("loud"));
    }
}

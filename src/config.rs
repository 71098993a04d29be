use std::path::PathBuf;

pub const DB_ENV: &str = "WEEKVIEWD_DB";
pub const LOG_ENV: &str = "WEEKVIEWD_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Process settings. Everything comes from the environment; the sidecar
/// takes no command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store to open before the first request, if any.
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup(DB_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { db_path }
    }
}

pub fn init_logging() {
    // stdout carries IPC responses, so logs must stay on stderr.
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, DEFAULT_LOG_FILTER))
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn db_path_is_optional() {
        assert_eq!(Config::from_lookup(lookup_from(&[])).db_path, None);
        assert_eq!(
            Config::from_lookup(lookup_from(&[(DB_ENV, "   ")])).db_path,
            None
        );
    }

    #[test]
    fn db_path_is_trimmed() {
        let cfg = Config::from_lookup(lookup_from(&[(DB_ENV, " /tmp/schedule.db\n")]));
        assert_eq!(cfg.db_path, Some(PathBuf::from("/tmp/schedule.db")));
    }
}

use crate::models::NotificationPermission;
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/storage.json";
pub const DEFAULT_POLL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub poll_interval: Duration,
    pub notification_permission: NotificationPermission,
    pub notification_auto_grant: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            notification_permission: NotificationPermission::Default,
            notification_auto_grant: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source. Values that do not parse
    /// keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = parsed(&lookup, "PORT", |raw| raw.parse::<u16>().ok()) {
            config.port = port;
        }
        if let Some(path) = lookup("APP_DATA_PATH").filter(|raw| !raw.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(secs) = parsed(&lookup, "REMINDER_POLL_SECS", |raw| {
            raw.parse::<u64>().ok().filter(|secs| *secs > 0)
        }) {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(permission) = parsed(&lookup, "NOTIFICATION_PERMISSION", |raw| {
            raw.parse::<NotificationPermission>().ok()
        }) {
            config.notification_permission = permission;
        }
        if let Some(auto_grant) = parsed(&lookup, "NOTIFICATION_AUTO_GRANT", parse_bool) {
            config.notification_auto_grant = auto_grant;
        }

        config
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        warn!("ignoring invalid {key}={raw:?}, using default");
    }
    value
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/storage.json"));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.notification_permission, NotificationPermission::Default);
        assert!(config.notification_auto_grant);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/habits.json"),
            ("REMINDER_POLL_SECS", "5"),
            ("NOTIFICATION_PERMISSION", "Granted"),
            ("NOTIFICATION_AUTO_GRANT", "no"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/tmp/habits.json"));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.notification_permission, NotificationPermission::Granted);
        assert!(!config.notification_auto_grant);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("REMINDER_POLL_SECS", "0"),
            ("NOTIFICATION_PERMISSION", "maybe"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.notification_permission, NotificationPermission::Default);
    }
}

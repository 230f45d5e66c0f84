use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use eyre::{eyre, Result};
use serde::Deserialize;
use switch_uart_pad::PointerConfig;

const DEFAULT_PATH: &str = "thumbstick.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct SerialConfig {
    pub(crate) device: String,
    pub(crate) baud: u32,
    pub(crate) timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_owned(),
            baud: 19200,
            timeout_ms: 1000,
        }
    }
}

impl SerialConfig {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct HttpConfig {
    pub(crate) bind: String,
    pub(crate) workers: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:80".to_owned(),
            workers: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) serial: SerialConfig,
    pub(crate) http: HttpConfig,
    pub(crate) pointer: PointerConfig,

    /// How long the exercise command is held after syncing
    pub(crate) settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            http: HttpConfig::default(),
            pointer: PointerConfig::default(),
            settle_ms: 500,
        }
    }
}

impl Config {
    pub(crate) fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Load the config from `path`, or from `thumbstick.toml` if no path was given and
/// that file exists. Without either, every field keeps its default.
pub(crate) fn load(path: Option<OsString>) -> Result<(Config, Option<PathBuf>)> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None if Path::new(DEFAULT_PATH).exists() => PathBuf::from(DEFAULT_PATH),
        None => return Ok((Config::default(), None)),
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
    let config = parse(&content)
        .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;
    Ok((config, Some(path)))
}

fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switch_uart_pad::Stick;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse("").unwrap();
        assert_eq!(config.serial.baud, 19200);
        assert_eq!(config.http.bind, "0.0.0.0:80");
        assert_eq!(config.pointer, PointerConfig::default());
        assert_eq!(config.settle(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_config() {
        let config = parse(
            r#"
            settle_ms = 0

            [serial]
            device = "COM5"

            [pointer]
            stick = "left"
            max_magnitude = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.serial.device, "COM5");
        assert_eq!(config.serial.timeout(), Duration::from_secs(1));
        assert_eq!(config.pointer.stick, Stick::Left);
        assert_eq!(config.pointer.max_magnitude, 10);
        assert_eq!(config.pointer.x_amp, 1.8);
        assert_eq!(config.settle_ms, 0);
    }

    #[test]
    fn test_unknown_stick_rejected() {
        assert!(parse("[pointer]\nstick = \"middle\"").is_err());
    }
}

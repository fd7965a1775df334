//! Kiosk configuration
//!
//! Command line flags with environment fallbacks; a `.env` file next to the
//! binary is loaded first.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use parche_client::{ClientConfig, Url};

use crate::core::{KioskError, KioskResult, KioskSettings};

/// Parche kiosk 配置
#[derive(Debug, Clone, Parser)]
#[command(name = "parche-kiosk", version, about = "Kiosk satisfaction survey")]
pub struct KioskConfig {
    /// Ratings web app URL
    #[arg(long, env = "PARCHE_API_URL")]
    pub api_url: String,

    /// PIN that unlocks the site setup
    #[arg(long, env = "PARCHE_ADMIN_PIN", default_value = "1234")]
    pub admin_pin: String,

    /// Seconds on the thanks screen before the survey restarts
    #[arg(long, env = "PARCHE_RESET_TIMEOUT", default_value_t = 15)]
    pub reset_timeout: u32,

    /// Verbose logging
    #[arg(long, env = "PARCHE_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Store file and logs live here
    #[arg(long, env = "PARCHE_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Callback transport timeout in milliseconds
    #[arg(long, env = "PARCHE_CALLBACK_TIMEOUT_MS", default_value_t = 12_000)]
    pub callback_timeout_ms: u64,

    /// Start every session on the welcome screen
    #[arg(long, env = "PARCHE_SHOW_WELCOME", default_value_t = false)]
    pub show_welcome: bool,
}

impl KioskConfig {
    /// `.env` first, then flags and environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn validate(&self) -> KioskResult<()> {
        Url::parse(&self.api_url)
            .map_err(|e| KioskError::Config(format!("invalid PARCHE_API_URL: {e}")))?;
        if self.admin_pin.is_empty() {
            return Err(KioskError::Config("PARCHE_ADMIN_PIN must not be empty".into()));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_callback_timeout(Duration::from_millis(self.callback_timeout_ms))
    }

    pub fn settings(&self) -> KioskSettings {
        KioskSettings {
            admin_pin: self.admin_pin.clone(),
            reset_seconds: self.reset_timeout,
            show_welcome: self.show_welcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> KioskConfig {
        let mut argv = vec!["parche-kiosk"];
        argv.extend_from_slice(args);
        KioskConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_map_to_settings_and_client() {
        let config = parse(&[
            "--api-url",
            "https://script.example.com/exec",
            "--admin-pin",
            "4321",
            "--reset-timeout",
            "30",
            "--callback-timeout-ms",
            "5000",
            "--data-dir",
            "/var/lib/parche",
            "--show-welcome",
        ]);

        config.validate().unwrap();
        let settings = config.settings();
        assert_eq!(settings.admin_pin, "4321");
        assert_eq!(settings.reset_seconds, 30);
        assert!(settings.show_welcome);

        let client = config.client_config();
        assert_eq!(client.base_url, "https://script.example.com/exec");
        assert_eq!(client.callback_timeout, Duration::from_secs(5));
        assert_eq!(config.log_dir(), PathBuf::from("/var/lib/parche/logs"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = parse(&["--api-url", "not a url", "--admin-pin", "1234"]);
        assert!(matches!(config.validate(), Err(KioskError::Config(_))));
    }
}

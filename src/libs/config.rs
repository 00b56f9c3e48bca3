//! Configuration management for studyguard.
//!
//! Settings live in a single JSON file inside the platform data directory and
//! are grouped by concern:
//!
//! - **Monitor Config**: tick cadence, recency window and heartbeat period
//! - **Server Config**: recording API endpoint and credentials
//! - **Extension Config**: study mode, blocked sites and nudge thresholds
//!
//! Every group is optional. A missing file or a missing group means defaults.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use studyguard::libs::config::{Config, MonitorConfig};
//!
//! let mut config = Config::read()?;
//! config.monitor = Some(MonitorConfig::default());
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::accumulator::{HEARTBEAT_EVERY_SECS, RECENCY_WINDOW, TICK_INTERVAL};
use super::data_storage::{DataStorage, DEFAULT_API_URL};
use super::extension::{StudyMode, DEFAULT_BLOCKED_SITES, NUDGE_MIN_SWITCHES, NUDGE_SCORE_THRESHOLD};
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module shown by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Page tracker timing.
///
/// Defaults mirror the accumulator constants: a 1 second tick, a 5 second
/// recency window and a heartbeat every 10 seconds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Period of the accumulator tick in milliseconds.
    pub tick_interval_ms: u64,

    /// Seconds after the last activity signal during which ticks still count as active.
    pub recency_window_secs: u64,

    /// Heartbeat cadence in seconds of total elapsed time.
    pub heartbeat_every_secs: u64,

    /// Capture native keyboard and mouse activity while watching.
    #[serde(default = "default_true")]
    pub input_listener: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            recency_window_secs: RECENCY_WINDOW.as_secs(),
            heartbeat_every_secs: HEARTBEAT_EVERY_SECS,
            input_listener: true,
        }
    }
}

/// Recording API connection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL, e.g. `http://localhost:8000/api/adaptive`.
    pub api_url: String,

    /// Bearer token sent with every request. Empty means anonymous.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: String::new(),
        }
    }
}

/// Extension context settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtensionConfig {
    pub study_mode: StudyMode,
    pub blocked_sites: Vec<String>,
    /// A nudge is raised below this attention score...
    pub nudge_score_threshold: f64,
    /// ...once more than this many switches happened.
    pub nudge_min_switches: u32,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            study_mode: StudyMode::Basic,
            blocked_sites: DEFAULT_BLOCKED_SITES.iter().map(|site| site.to_string()).collect(),
            nudge_score_threshold: NUDGE_SCORE_THRESHOLD,
            nudge_min_switches: NUDGE_MIN_SWITCHES,
        }
    }
}

/// Root configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MonitorConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionConfig>,
}

impl Config {
    /// Reads the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` when there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    fn modules() -> Vec<ConfigModule> {
        vec![
            ConfigModule {
                key: "monitor".to_string(),
                name: Message::ConfigModuleMonitor.to_string(),
            },
            ConfigModule {
                key: "server".to_string(),
                name: Message::ConfigModuleServer.to_string(),
            },
            ConfigModule {
                key: "extension".to_string(),
                name: Message::ConfigModuleExtension.to_string(),
            },
        ]
    }

    /// Runs the interactive setup wizard, starting from the stored values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let modules = Self::modules();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "monitor" => {
                    let default = config.monitor.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleMonitor);
                    config.monitor = Some(MonitorConfig {
                        tick_interval_ms: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptTickInterval.to_string())
                            .default(default.tick_interval_ms)
                            .interact_text()?,
                        recency_window_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRecencyWindow.to_string())
                            .default(default.recency_window_secs)
                            .interact_text()?,
                        heartbeat_every_secs: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptHeartbeatEvery.to_string())
                            .default(default.heartbeat_every_secs)
                            .interact_text()?,
                        input_listener: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInputListener.to_string())
                            .default(default.input_listener)
                            .interact()?,
                    });
                }
                "server" => {
                    let default = config.server.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        api_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiUrl.to_string())
                            .default(default.api_url)
                            .interact_text()?,
                        auth_token: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerAuthToken.to_string())
                            .default(default.auth_token)
                            .allow_empty(true)
                            .interact_text()?,
                    });
                }
                "extension" => {
                    let default = config.extension.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleExtension);
                    let modes = [StudyMode::Basic, StudyMode::Exam];
                    let mode_index = Select::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptStudyMode.to_string())
                        .items(&modes)
                        .default(modes.iter().position(|mode| *mode == default.study_mode).unwrap_or(0))
                        .interact()?;
                    let blocked_sites: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptBlockedSites.to_string())
                        .default(default.blocked_sites.join(", "))
                        .allow_empty(true)
                        .interact_text()?;
                    config.extension = Some(ExtensionConfig {
                        study_mode: modes[mode_index],
                        blocked_sites: blocked_sites
                            .split(',')
                            .map(|site| site.trim().to_string())
                            .filter(|site| !site.is_empty())
                            .collect(),
                        ..default
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

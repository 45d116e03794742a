use serde::Deserialize;

use crate::broker::OverflowPolicy;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub client: ClientSettings,
    pub hub: HubSettings,
    pub logging: LoggingSettings,
}

/// Per-client settings.
///
/// `intake_buffer` bounds how many messages may wait for a client's
/// matching loop before the hub's overflow policy kicks in.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientSettings {
    pub intake_buffer: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HubSettings {
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize, Default)]
pub struct PartialSettings {
    pub client: Option<PartialClientSettings>,
    pub hub: Option<PartialHubSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub intake_buffer: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub overflow: Option<OverflowPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings { intake_buffer: 32 },
            hub: HubSettings {
                overflow: OverflowPolicy::Block,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Overlay the values that were provided onto `base`.
    pub fn merge_into(self, base: Settings) -> Settings {
        Settings {
            client: ClientSettings {
                intake_buffer: self
                    .client
                    .and_then(|c| c.intake_buffer)
                    .unwrap_or(base.client.intake_buffer),
            },
            hub: HubSettings {
                overflow: self
                    .hub
                    .and_then(|h| h.overflow)
                    .unwrap_or(base.hub.overflow),
            },
            logging: LoggingSettings {
                level: self
                    .logging
                    .and_then(|l| l.level)
                    .unwrap_or(base.logging.level),
            },
        }
    }
}

use std::collections::HashMap;
use std::env;
use std::fs;

use chrono_tz::Tz;

use crate::calendar::FetchFailurePolicy;
use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_RANGES_PATH: &str = "/bookings/room/{roomId}";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_STORE_LOCATION: &str = "./data/selection";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    /// File values win over the process environment.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().or_else(|| env::var(key).ok())
    }

    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let timezone_name = self
            .get("CALENDAR_TIMEZONE")
            .unwrap_or(DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "CALENDAR_TIMEZONE".to_string(),
                value: timezone_name.clone(),
            })?;

        let failure_policy = match self.get("FETCH_FAILURE_POLICY").as_deref() {
            None | Some("fail_open") => FetchFailurePolicy::FailOpen,
            Some("fail_closed") => FetchFailurePolicy::FailClosed,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "FETCH_FAILURE_POLICY".to_string(),
                    value: other.to_string(),
                });
            }
        };

        Ok(Settings {
            api_url: self
                .get("BOOKING_API_URL")
                .unwrap_or(DEFAULT_API_URL.to_string()),
            ranges_path: self
                .get("BOOKING_RANGES_PATH")
                .unwrap_or(DEFAULT_RANGES_PATH.to_string()),
            timezone,
            failure_policy,
            store_location: self
                .get("SELECTION_STORE_LOCATION")
                .unwrap_or(DEFAULT_STORE_LOCATION.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub ranges_path: String,
    pub timezone: Tz,
    pub failure_policy: FetchFailurePolicy,
    pub store_location: String,
}

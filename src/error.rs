use thiserror::Error;

/// Failures talking to the date-range provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Provider error: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored selection for {0} is invalid")]
    Invalid(String),
}

/// Problems reading the booking fixture served by the local provider.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture {path} is not a room-to-bookings map: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

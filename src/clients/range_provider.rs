use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::models::occupancy::{intervals_from_body, OccupiedInterval};

/// Source of existing bookings for a room.
#[async_trait]
pub trait RangeProvider: Send + Sync {
    async fn fetch_ranges(&self, room_id: &str) -> Result<Vec<OccupiedInterval>, ProviderError>;
}

pub struct HttpRangeProvider {
    client: reqwest::Client,
    base_url: String,
    path_template: String,
}

impl HttpRangeProvider {
    /// `path_template` must contain `{roomId}`.
    pub fn new(base_url: impl Into<String>, path_template: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            path_template: path_template.into(),
        }
    }

    /// The room id always lands in the path as one percent-encoded segment.
    pub fn url_for(&self, room_id: &str) -> Result<Url, ProviderError> {
        if matches!(room_id, "" | "." | "..") {
            return Err(ProviderError::Other(format!("Invalid room id {:?}", room_id)));
        }
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ProviderError::Other(format!("Invalid provider url {}: {}", self.base_url, e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::Other(format!("Provider url {} cannot take a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in self.path_template.split('/').filter(|s| !s.is_empty()) {
                if segment == "{roomId}" {
                    segments.push(room_id);
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }
}

/// Reads a provider body. A body that is not JSON is handled like any other
/// non-array answer.
pub fn parse_ranges_body(body: &str) -> Vec<OccupiedInterval> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => intervals_from_body(&value),
        Err(err) => {
            warn!(error = %err, "Booking range response is not JSON, treating as empty");
            Vec::new()
        }
    }
}

#[async_trait]
impl RangeProvider for HttpRangeProvider {
    async fn fetch_ranges(&self, room_id: &str) -> Result<Vec<OccupiedInterval>, ProviderError> {
        let url = self.url_for(room_id)?;
        debug!(%url, "Fetching booking ranges");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ProviderError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            debug!(%status, body = %text, "Booking range request failed");
            return Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(parse_ranges_body(&text))
    }
}

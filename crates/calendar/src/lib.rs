//! # Folio Calendar
//!
//! Client for an external calendar service speaking a small JSON protocol:
//!
//! - `GET {base}/busy?start=<rfc3339>&end=<rfc3339>` returns `[{"start", "end"}]`
//! - `POST {base}/events` with an event request returns `{"id"}`
//!
//! The service owns provider credentials (Google Calendar or otherwise); this
//! crate only moves busy intervals and booking requests across the wire.

pub mod config;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::{debug, warn};

use folio_core::{
    calendar::CalendarBackend,
    errors::{FolioError, FolioResult},
    models::schedule::{EventId, EventRequest, Interval},
};

use config::CalendarConfig;

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

/// Calendar backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCalendarBackend {
    client: reqwest::Client,
    config: CalendarConfig,
}

impl HttpCalendarBackend {
    pub fn new(config: CalendarConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .wrap_err("Failed to build calendar HTTP client")?;

        Ok(Self { client, config })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_busy(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Interval>> {
        let request = self.client.get(self.config.endpoint("busy")).query(&[
            ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ]);

        let intervals = self
            .authorize(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Interval>>()
            .await?;

        Ok(intervals)
    }

    async fn post_event(&self, event: &EventRequest) -> Result<reqwest::Response> {
        let request = self.client.post(self.config.endpoint("events")).json(event);
        Ok(self.authorize(request).send().await?)
    }
}

#[async_trait]
impl CalendarBackend for HttpCalendarBackend {
    async fn list_busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> FolioResult<Vec<Interval>> {
        debug!("Fetching busy intervals from {} to {}", start, end);

        self.fetch_busy(start, end).await.map_err(|e| {
            warn!("Calendar busy lookup failed: {:#}", e);
            FolioError::Upstream("Calendar service did not return busy intervals".to_string())
        })
    }

    async fn create_event(&self, request: EventRequest) -> FolioResult<EventId> {
        debug!("Creating calendar event at {}", request.start_time);

        let response = self.post_event(&request).await.map_err(|e| {
            warn!("Calendar event request failed: {:#}", e);
            FolioError::Upstream("Calendar service is unreachable".to_string())
        })?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(FolioError::Conflict(
                "This time slot is already booked. Please choose another time.".to_string(),
            ));
        }

        let created = response
            .error_for_status()
            .map_err(|e| {
                warn!("Calendar rejected event: {}", e);
                FolioError::Upstream("Calendar service rejected the event".to_string())
            })?
            .json::<CreatedEvent>()
            .await
            .map_err(|e| {
                warn!("Calendar returned an unreadable event: {}", e);
                FolioError::Upstream("Calendar service returned an invalid response".to_string())
            })?;

        Ok(EventId(created.id))
    }
}

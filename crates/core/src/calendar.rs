//! Boundary to the calendar that owns the booked meetings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    errors::FolioResult,
    models::schedule::{EventId, EventRequest, Interval},
};

/// Source of busy intervals and sink for new meetings.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Busy intervals that intersect `[start, end)`, in no particular order.
    async fn list_busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> FolioResult<Vec<Interval>>;

    async fn create_event(&self, request: EventRequest) -> FolioResult<EventId>;
}

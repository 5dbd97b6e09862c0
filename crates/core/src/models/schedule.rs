use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::errors::{FolioError, FolioResult};

/// A wall-clock time of day at minute resolution, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> FolioResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeSlot)
            .ok_or_else(|| {
                FolioError::Validation(format!("{:02}:{:02} is not a valid time of day", hour, minute))
            })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }

    fn minutes_from_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    fn from_minutes(minutes: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).map(TimeSlot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FolioError::Validation(format!("'{}' is not a time in HH:MM format", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;

        TimeSlot::new(hour, minute)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The fixed list of candidate starting times offered for booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    /// Wraps an already ordered list of slots.
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }

    /// Builds `start, start + step, ...` up to and including `end`.
    pub fn between(start: TimeSlot, end: TimeSlot, step_minutes: u32) -> FolioResult<Self> {
        if step_minutes == 0 {
            return Err(FolioError::Validation(
                "Slot step must be at least one minute".to_string(),
            ));
        }
        if end < start {
            return Err(FolioError::Validation(format!(
                "Day end {} is before day start {}",
                end, start
            )));
        }

        let slots = (start.minutes_from_midnight()..=end.minutes_from_midnight())
            .step_by(step_minutes as usize)
            .filter_map(TimeSlot::from_minutes)
            .collect();

        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.slots.contains(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SlotCatalog {
    /// Half-hour marks from 09:00 through 17:00.
    fn default() -> Self {
        let slots = (9 * 60..=17 * 60)
            .step_by(30)
            .filter_map(TimeSlot::from_minutes)
            .collect();
        Self { slots }
    }
}

/// An already-booked period on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub date: NaiveDate,
    pub time_zone: String,
    pub slot_minutes: u32,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCatalogResponse {
    pub time_zone: String,
    pub slot_minutes: u32,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn validate(&self) -> FolioResult<()> {
        super::require_text("name", &self.name)?;
        super::require_email(&self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub event_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Event creation payload sent to the calendar backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attendee_email: String,
}

/// Identifier the calendar backend assigned to a created event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! # Slot Availability
//!
//! Computes which catalog slots on a given day can still be booked. A slot is
//! bookable when it does not start before `now` and does not overlap any busy
//! interval. Overlap uses half-open semantics, so a meeting ending at 09:30
//! leaves the 09:30 slot free.
//!
//! Slot times are wall-clock times in the calendar owner's time zone. A time
//! that does not exist on the requested date (the hour skipped by a DST
//! transition) is never offered; an ambiguous one resolves to its earlier
//! instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::models::schedule::{Interval, SlotCatalog, TimeSlot};

/// Resolves `date @ time` in `tz` to an absolute instant.
pub fn local_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Longest stretch of local time a zone transition can skip.
const MAX_TRANSITION_GAP_MINUTES: i64 = 180;

/// First instant of the local day. Some zones skip midnight when clocks go
/// forward, in which case the day starts at the end of the gap.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=MAX_TRANSITION_GAP_MINUTES)
        .map(|minutes| midnight + Duration::minutes(minutes))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|instant| instant.with_timezone(&Utc))
}

/// The `[start, end)` instants covering `date` from the start of its local day
/// to the start of the next one.
pub fn day_bounds<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = start_of_day(tz, date)?;
    let end = start_of_day(tz, date.succ_opt()?)?;
    Some((start, end))
}

/// Start and end instants of one slot, or `None` if its local time does not exist.
pub fn slot_bounds<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    slot: TimeSlot,
    duration: Duration,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_instant(tz, date, slot.as_naive_time())?;
    Some((start, start + duration))
}

/// Returns the bookable slots of `catalog` on `date`, in catalog order.
///
/// Busy intervals may be unsorted, overlapping or malformed; every interval is
/// checked against every slot with the same overlap test.
pub fn available_slots<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    catalog: &SlotCatalog,
    busy: &[Interval],
    now: DateTime<Utc>,
    duration: Duration,
) -> Vec<TimeSlot> {
    catalog
        .slots()
        .iter()
        .copied()
        .filter(|slot| match slot_bounds(tz, date, *slot, duration) {
            Some((start, end)) => start >= now && !busy.iter().any(|b| b.overlaps(start, end)),
            None => false,
        })
        .collect()
}

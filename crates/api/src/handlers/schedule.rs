use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use folio_core::{
    availability,
    errors::FolioError,
    models::schedule::{
        AvailableSlotsResponse, BookingRequest, BookingResponse, EventRequest, Interval,
        SlotCatalogResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::{ApiState, config::ScheduleSettings, middleware::error_handling::AppError};

pub const SLOTS_UNAVAILABLE: &str = "Sorry, we failed to load available time slots. Please try again.";
pub const SLOT_TAKEN: &str = "This time slot is already booked. Please choose another time.";
pub const SLOT_PASSED: &str = "This time slot has already passed. Please choose another time.";
pub const BOOKING_FAILED: &str = "Failed to schedule meeting. Please try again.";

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// Busy intervals covering the whole local day of `date`.
async fn busy_on(state: &ApiState, date: NaiveDate) -> Result<Vec<Interval>, AppError> {
    let schedule = &state.schedule;
    let (start, end) = availability::day_bounds(&schedule.time_zone, date)
        .ok_or_else(|| FolioError::Validation(format!("{} is outside the supported date range", date)))?;

    state
        .calendar
        .list_busy_intervals(start, end)
        .await
        .map_err(|e| {
            error!("Failed to fetch busy intervals for {}: {}", date, e);
            AppError(FolioError::Upstream(SLOTS_UNAVAILABLE.to_string()))
        })
}

fn zone_name(schedule: &ScheduleSettings) -> String {
    schedule.time_zone.name().to_string()
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let busy = busy_on(&state, query.date).await?;
    let schedule = &state.schedule;

    let slots = availability::available_slots(
        &schedule.time_zone,
        query.date,
        &schedule.catalog,
        &busy,
        Utc::now(),
        schedule.slot_duration(),
    );

    Ok(Json(AvailableSlotsResponse {
        date: query.date,
        time_zone: zone_name(schedule),
        slot_minutes: schedule.slot_minutes,
        slots,
    }))
}

#[axum::debug_handler]
pub async fn get_slot_catalog(State(state): State<Arc<ApiState>>) -> Json<SlotCatalogResponse> {
    let schedule = &state.schedule;
    Json(SlotCatalogResponse {
        time_zone: zone_name(schedule),
        slot_minutes: schedule.slot_minutes,
        slots: schedule.catalog.slots().to_vec(),
    })
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    payload.validate()?;
    let schedule = &state.schedule;

    if !schedule.catalog.contains(&payload.time) {
        return Err(FolioError::Validation(format!("{} is not an offered time slot", payload.time)).into());
    }

    let (start_time, end_time) = availability::slot_bounds(
        &schedule.time_zone,
        payload.date,
        payload.time,
        schedule.slot_duration(),
    )
    .ok_or_else(|| {
        FolioError::Validation(format!("{} does not exist on {}", payload.time, payload.date))
    })?;

    let now = Utc::now();
    if start_time < now {
        return Err(FolioError::Validation(SLOT_PASSED.to_string()).into());
    }

    // Recompute against a fresh busy set; the visitor's slot list may be stale.
    let busy = busy_on(&state, payload.date).await?;
    let open = availability::available_slots(
        &schedule.time_zone,
        payload.date,
        &schedule.catalog,
        &busy,
        now,
        schedule.slot_duration(),
    );
    if !open.contains(&payload.time) {
        return Err(FolioError::Conflict(SLOT_TAKEN.to_string()).into());
    }

    let name = payload.name.trim();
    let request = EventRequest {
        summary: format!("Meeting with {}", name),
        description: payload
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Meeting requested by {} <{}>", name, payload.email.trim())),
        start_time,
        end_time,
        attendee_email: payload.email.trim().to_string(),
    };

    let event_id = state.calendar.create_event(request).await.map_err(|e| match e {
        FolioError::Conflict(_) => AppError(FolioError::Conflict(SLOT_TAKEN.to_string())),
        other => {
            error!("Calendar backend rejected booking: {}", other);
            AppError(FolioError::Upstream(BOOKING_FAILED.to_string()))
        }
    })?;

    info!(
        "Booked {} {} for {} (event {})",
        payload.date, payload.time, payload.email, event_id
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            event_id: event_id.0,
            start_time,
            end_time,
        }),
    ))
}

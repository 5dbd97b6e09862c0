use axum::http::StatusCode;
use chrono::{NaiveDate, TimeZone, Utc};
use folio_api::{
    config::ScheduleSettings,
    handlers::schedule::{BOOKING_FAILED, SLOT_PASSED, SLOT_TAKEN, SLOTS_UNAVAILABLE},
};
use folio_core::{
    errors::FolioError,
    models::schedule::{AvailableSlotsResponse, BookingResponse, EventId, Interval, SlotCatalogResponse},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use test_log::test;

use crate::test_utils::TestContext;

// A Monday in January, well clear of any DST change. 09:00 in Los Angeles is 17:00 UTC.
const DAY: &str = "2099-01-05";

fn utc(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, 5, hour, minute, 0).unwrap()
}

fn booking(time: &str) -> Value {
    json!({
        "date": DAY,
        "time": time,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "notes": "Talk about the engine"
    })
}

#[test(tokio::test)]
async fn lists_every_catalog_slot_on_a_free_day() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .withf(|start, end| *start == utc(8, 0) && *end == utc(8, 0) + chrono::Duration::days(1))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/schedule/slots")
        .add_query_param("date", DAY)
        .await;
    response.assert_status_ok();

    let body: AvailableSlotsResponse = response.json();
    assert_eq!(body.date, NaiveDate::from_ymd_opt(2099, 1, 5).unwrap());
    assert_eq!(body.time_zone, "America/Los_Angeles");
    assert_eq!(body.slot_minutes, 30);
    assert_eq!(body.slots.len(), 17);
    assert_eq!(body.slots.first().map(|s| s.to_string()), Some("09:00".to_string()));
    assert_eq!(body.slots.last().map(|s| s.to_string()), Some("17:00".to_string()));
}

#[test(tokio::test)]
async fn busy_meeting_removes_overlapping_slots() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(vec![Interval::new(utc(17, 0), utc(18, 0))]));
    let server = ctx.server();

    let body: AvailableSlotsResponse = server
        .get("/api/schedule/slots")
        .add_query_param("date", DAY)
        .await
        .json();

    let slots: Vec<String> = body.slots.iter().map(ToString::to_string).collect();
    assert!(!slots.contains(&"09:00".to_string()));
    assert!(!slots.contains(&"09:30".to_string()));
    assert_eq!(slots.first().map(String::as_str), Some("10:00"));
    assert_eq!(slots.len(), 15);
}

#[test(tokio::test)]
async fn past_day_has_no_slots() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));
    let server = ctx.server();

    let body: AvailableSlotsResponse = server
        .get("/api/schedule/slots")
        .add_query_param("date", "2001-06-04")
        .await
        .json();

    assert!(body.slots.is_empty());
}

#[test(tokio::test)]
async fn calendar_failure_is_reported_as_bad_gateway() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Err(FolioError::Upstream("connection refused".to_string())));
    let server = ctx.server();

    let response = server
        .get("/api/schedule/slots")
        .add_query_param("date", DAY)
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>(), json!({ "error": SLOTS_UNAVAILABLE }));
}

#[test(tokio::test)]
async fn catalog_lists_configured_slots() {
    let server = TestContext::new().server();

    let body: SlotCatalogResponse = server.get("/api/schedule/catalog").await.json();

    assert_eq!(body.time_zone, "America/Los_Angeles");
    assert_eq!(body.slots.len(), 17);
}

#[test(tokio::test)]
async fn booking_a_free_slot_creates_an_event() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(vec![Interval::new(utc(17, 0), utc(17, 30))]));
    ctx.calendar
        .expect_create_event()
        .withf(|request| {
            request.summary == "Meeting with Ada Lovelace"
                && request.description == "Talk about the engine"
                && request.attendee_email == "ada@example.com"
                && request.start_time == utc(17, 30)
                && request.end_time == utc(18, 0)
        })
        .times(1)
        .returning(|_| Ok(EventId("evt-42".to_string())));
    let server = ctx.server();

    let response = server.post("/api/schedule/bookings").json(&booking("09:30")).await;
    response.assert_status(StatusCode::CREATED);

    let body: BookingResponse = response.json();
    assert_eq!(body.event_id, "evt-42");
    assert_eq!(body.start_time, utc(17, 30));
    assert_eq!(body.end_time, utc(18, 0));
}

#[test(tokio::test)]
async fn booking_a_taken_slot_is_a_conflict() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(vec![Interval::new(utc(17, 15), utc(17, 45))]));
    ctx.calendar.expect_create_event().never();
    let server = ctx.server();

    let response = server.post("/api/schedule/bookings").json(&booking("09:00")).await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>(), json!({ "error": SLOT_TAKEN }));
}

#[test(tokio::test)]
async fn conflict_from_the_calendar_uses_the_same_message() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));
    ctx.calendar
        .expect_create_event()
        .returning(|_| Err(FolioError::Conflict("overlaps appointment".to_string())));
    let server = ctx.server();

    let response = server.post("/api/schedule/bookings").json(&booking("10:00")).await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>(), json!({ "error": SLOT_TAKEN }));
}

#[test(tokio::test)]
async fn booking_failure_is_reported_without_retry() {
    let mut ctx = TestContext::new();
    ctx.calendar
        .expect_list_busy_intervals()
        .returning(|_, _| Ok(Vec::new()));
    ctx.calendar
        .expect_create_event()
        .times(1)
        .returning(|_| Err(FolioError::Upstream("503 from provider".to_string())));
    let server = ctx.server();

    let response = server.post("/api/schedule/bookings").json(&booking("10:00")).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>(), json!({ "error": BOOKING_FAILED }));
}

#[test(tokio::test)]
async fn booking_in_the_past_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.calendar.expect_list_busy_intervals().never();
    ctx.calendar.expect_create_event().never();
    let server = ctx.server();

    let mut request = booking("09:00");
    request["date"] = json!("2001-06-04");
    let response = server.post("/api/schedule/bookings").json(&request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": SLOT_PASSED }));
}

#[test(tokio::test)]
async fn booking_outside_the_catalog_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.calendar.expect_create_event().never();
    let server = ctx.server();

    let response = server.post("/api/schedule/bookings").json(&booking("08:00")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test(tokio::test)]
async fn booking_requires_a_valid_email() {
    let mut ctx = TestContext::new();
    ctx.calendar.expect_create_event().never();
    let server = ctx.server();

    let mut request = booking("09:00");
    request["email"] = json!("not-an-email");
    let response = server.post("/api/schedule/bookings").json(&request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test(tokio::test)]
async fn day_without_a_local_midnight_still_lists_slots() {
    let mut ctx = TestContext::new();
    ctx.schedule = ScheduleSettings::from_parts("America/Santiago", "09:00", "17:00", "30").unwrap();
    ctx.calendar
        .expect_list_busy_intervals()
        .withf(|start, _| *start == Utc.with_ymd_and_hms(2030, 9, 8, 4, 0, 0).unwrap())
        .returning(|_, _| Ok(Vec::new()));
    let server = ctx.server();

    let response = server
        .get("/api/schedule/slots")
        .add_query_param("date", "2030-09-08")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<AvailableSlotsResponse>().time_zone, "America/Santiago");
}

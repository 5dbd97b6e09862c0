//! Appointments booked through the site, and a calendar backend built on them.
//!
//! Used when no external calendar service is configured: busy intervals are
//! the scheduled appointments, and creating an event inserts an appointment
//! after checking that nothing scheduled overlaps it. The check and the insert
//! run in one transaction holding an advisory lock, so concurrent bookings
//! are serialized.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres, postgres::PgExecutor};
use uuid::Uuid;

use folio_core::{
    calendar::CalendarBackend,
    errors::{FolioError, FolioResult},
    models::schedule::{EventId, EventRequest, Interval},
};

use crate::models::DbAppointment;

pub const STATUS_SCHEDULED: &str = "scheduled";

/// Advisory lock key held while a booking is checked and inserted.
const BOOKING_LOCK_KEY: i64 = 0x666f_6c69_6f62_6b67;

/// Scheduled appointments intersecting `[start, end)`.
pub async fn get_appointments_between<'e>(
    executor: impl PgExecutor<'e>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, summary, attendee_email, description, start_time, end_time, status, created_at, updated_at
        FROM appointments
        WHERE status = $1 AND start_time < $3 AND end_time > $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(STATUS_SCHEDULED)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

pub async fn create_appointment<'e>(
    executor: impl PgExecutor<'e>,
    summary: &str,
    attendee_email: &str,
    description: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, start={}, end={}",
        id, start_time, end_time
    );

    let row = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, summary, attendee_email, description, start_time, end_time, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING id, summary, attendee_email, description, start_time, end_time, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(summary)
    .bind(attendee_email)
    .bind(description)
    .bind(start_time)
    .bind(end_time)
    .bind(STATUS_SCHEDULED)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Calendar backend that records bookings in the `appointments` table.
#[derive(Debug, Clone)]
pub struct AppointmentCalendar {
    pool: Pool<Postgres>,
}

impl AppointmentCalendar {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarBackend for AppointmentCalendar {
    async fn list_busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> FolioResult<Vec<Interval>> {
        let rows = get_appointments_between(&self.pool, start, end).await?;
        Ok(rows.iter().map(DbAppointment::interval).collect())
    }

    async fn create_event(&self, request: EventRequest) -> FolioResult<EventId> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOKING_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let clashes = get_appointments_between(&mut *tx, request.start_time, request.end_time).await?;
        if !clashes.is_empty() {
            return Err(FolioError::Conflict(
                "This time slot is already booked. Please choose another time.".to_string(),
            ));
        }

        let row = create_appointment(
            &mut *tx,
            &request.summary,
            &request.attendee_email,
            &request.description,
            request.start_time,
            request.end_time,
        )
        .await?;
        tx.commit().await.map_err(database_error)?;

        Ok(EventId(row.id.to_string()))
    }
}

fn database_error(err: sqlx::Error) -> FolioError {
    FolioError::Database(err.into())
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the versioned major-tournament calendar.
///
/// A template year carries four named events with Monday start dates.
/// Generating majors for a later year advances each start date by whole
/// years, preserving the day of month. New template years can be inserted
/// to re-anchor the calendar without code changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MajorTemplate {
    pub template_id: Uuid,
    pub template_year: i32,
    pub name: String,
    pub venue: Option<String>,
    pub start_month: i16,
    pub start_day: i16,
    pub sort_order: i16,
}

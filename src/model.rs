use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Car {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub engine: String,
    pub color: String,
    pub tire_count: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Car data exchanged between the controller and the service.
///
/// Every field is optional here; the service decides what is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CarDto {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub engine: Option<String>,
    pub color: Option<String>,
    pub tire_count: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Current time at the microsecond resolution Postgres stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

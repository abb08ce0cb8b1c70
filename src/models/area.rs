//! Area model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Organizational area ("eje") database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

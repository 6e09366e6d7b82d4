use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 100;
pub const OWNER_MAX_LEN: usize = 50;

/// One row of the `ann` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub create_date: DateTime<Utc>,
    pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnouncementRequest {
    /// Normally assigned by storage; a caller may pin it explicitly.
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub owner: String,
}

/// Partial update. Only these fields are mutable; anything else in the body is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
}

impl UpdateAnnouncementRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.owner.is_none()
    }

    /// Overwrites each supplied field on `ann`.
    pub fn apply_to(&self, ann: &mut Announcement) {
        if let Some(title) = &self.title {
            ann.title = title.clone();
        }
        if let Some(description) = &self.description {
            ann.description = description.clone();
        }
        if let Some(owner) = &self.owner {
            ann.owner = owner.clone();
        }
    }
}

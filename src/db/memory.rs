use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{Session, SessionFactory};
use crate::{
    error::{StoreError, UniqueConstraint},
    models::announcement::{
        Announcement, CreateAnnouncementRequest, DESCRIPTION_MAX_LEN, OWNER_MAX_LEN, TITLE_MAX_LEN,
    },
};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Announcement>,
    next_id: i64,
}

impl Table {
    fn owner_taken(&self, owner: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.owner == owner && Some(row.id) != except)
    }
}

/// Non-persistent backend with the same constraints as the `ann` table.
#[derive(Clone, Default)]
pub struct MemorySessionFactory {
    table: Arc<Mutex<Table>>,
}

impl MemorySessionFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionFactory for MemorySessionFactory {
    async fn open(&self) -> Result<Box<dyn Session>, StoreError> {
        Ok(Box::new(MemorySession {
            table: self.table.clone(),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

pub struct MemorySession {
    table: Arc<Mutex<Table>>,
}

fn check_lengths(title: &str, description: &str, owner: &str) -> Result<(), StoreError> {
    if title.chars().count() > TITLE_MAX_LEN
        || description.chars().count() > DESCRIPTION_MAX_LEN
        || owner.chars().count() > OWNER_MAX_LEN
    {
        return Err(StoreError::ValueTooLong);
    }
    Ok(())
}

#[async_trait]
impl Session for MemorySession {
    async fn get(&mut self, id: i64) -> Result<Option<Announcement>, StoreError> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn insert(&mut self, req: &CreateAnnouncementRequest) -> Result<Announcement, StoreError> {
        check_lengths(&req.title, &req.description, &req.owner)?;

        let mut table = self.table.lock().await;
        // Like an identity column, the sequence advances even when the insert fails
        // and does not skip over explicit ids.
        let id = match req.id {
            Some(id) => id,
            None => {
                table.next_id += 1;
                table.next_id
            }
        };
        if table.rows.contains_key(&id) {
            return Err(StoreError::UniqueViolation {
                constraint: UniqueConstraint::Id,
            });
        }
        if table.owner_taken(&req.owner, None) {
            return Err(StoreError::UniqueViolation {
                constraint: UniqueConstraint::Owner,
            });
        }

        let ann = Announcement {
            id,
            title: req.title.clone(),
            description: req.description.clone(),
            create_date: Utc::now(),
            owner: req.owner.clone(),
        };
        table.rows.insert(id, ann.clone());
        Ok(ann)
    }

    async fn update(&mut self, ann: &Announcement) -> Result<Option<Announcement>, StoreError> {
        check_lengths(&ann.title, &ann.description, &ann.owner)?;

        let mut table = self.table.lock().await;
        let owner_taken = table.owner_taken(&ann.owner, Some(ann.id));
        let Some(row) = table.rows.get_mut(&ann.id) else {
            return Ok(None);
        };
        if owner_taken {
            return Err(StoreError::UniqueViolation {
                constraint: UniqueConstraint::Owner,
            });
        }
        row.title = ann.title.clone();
        row.description = ann.description.clone();
        row.owner = ann.owner.clone();
        Ok(Some(row.clone()))
    }

    async fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }
}

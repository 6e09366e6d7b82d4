use async_trait::async_trait;
use sqlx::{pool::PoolConnection, Connection, PgPool, Postgres};

use super::{Session, SessionFactory};
use crate::{
    error::StoreError,
    models::announcement::{Announcement, CreateAnnouncementRequest},
};

#[derive(Clone)]
pub struct PgSessionFactory {
    pool: PgPool,
}

impl PgSessionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    async fn open(&self) -> Result<Box<dyn Session>, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgSession { conn }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Holds one pooled connection; it goes back to the pool when the session is dropped.
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl Session for PgSession {
    async fn get(&mut self, id: i64) -> Result<Option<Announcement>, StoreError> {
        let ann = sqlx::query_as::<_, Announcement>("SELECT * FROM ann WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(ann)
    }

    async fn insert(&mut self, req: &CreateAnnouncementRequest) -> Result<Announcement, StoreError> {
        let mut tx = self.conn.begin().await?;
        let ann = match req.id {
            Some(id) => {
                sqlx::query_as::<_, Announcement>(
                    "INSERT INTO ann (id, title, description, owner)
                     VALUES ($1, $2, $3, $4)
                     RETURNING *",
                )
                .bind(id)
                .bind(&req.title)
                .bind(&req.description)
                .bind(&req.owner)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, Announcement>(
                    "INSERT INTO ann (title, description, owner)
                     VALUES ($1, $2, $3)
                     RETURNING *",
                )
                .bind(&req.title)
                .bind(&req.description)
                .bind(&req.owner)
                .fetch_one(&mut *tx)
                .await?
            }
        };
        tx.commit().await?;
        Ok(ann)
    }

    async fn update(&mut self, ann: &Announcement) -> Result<Option<Announcement>, StoreError> {
        let mut tx = self.conn.begin().await?;
        let updated = sqlx::query_as::<_, Announcement>(
            "UPDATE ann
             SET title = $1,
                 description = $2,
                 owner = $3
             WHERE id = $4
             RETURNING *",
        )
        .bind(&ann.title)
        .bind(&ann.description)
        .bind(&ann.owner)
        .bind(ann.id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("DELETE FROM ann WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

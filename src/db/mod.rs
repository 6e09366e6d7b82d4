pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::{
    error::StoreError,
    models::announcement::{Announcement, CreateAnnouncementRequest},
};

pub use memory::MemorySessionFactory;
pub use postgres::PgSessionFactory;

/// A request-scoped handle to storage. Every write is committed before the call returns.
#[async_trait]
pub trait Session: Send {
    async fn get(&mut self, id: i64) -> Result<Option<Announcement>, StoreError>;

    async fn insert(&mut self, req: &CreateAnnouncementRequest) -> Result<Announcement, StoreError>;

    /// Persists the mutable columns of `ann`. `None` if the row no longer exists.
    async fn update(&mut self, ann: &Announcement) -> Result<Option<Announcement>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&mut self, id: i64) -> Result<bool, StoreError>;
}

/// Process-wide source of sessions, created once at startup.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Session>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self);
}

pub async fn create_pool(options: PgConnectOptions, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the `ann` table and its indexes if absent (migrations embedded from ./migrations/).
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

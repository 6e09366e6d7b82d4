use axum::Json;
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    extract::{AnnId, ApiJson},
    middleware::session::DbSession,
    models::announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    services::announcements::AnnouncementService,
};

/// GET /ann/{ann_id}
pub async fn get_announcement(
    db: DbSession,
    AnnId(id): AnnId,
) -> Result<Json<Announcement>, ApiError> {
    let mut session = db.lock().await;
    let ann = AnnouncementService::get(session.as_mut(), id).await?;
    Ok(Json(ann))
}

/// POST /ann — responds with the assigned id only.
pub async fn create_announcement(
    db: DbSession,
    ApiJson(body): ApiJson<CreateAnnouncementRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut session = db.lock().await;
    let ann = AnnouncementService::create(session.as_mut(), &body).await?;
    tracing::info!("Created announcement {} for {}", ann.id, ann.owner);
    Ok(Json(json!({ "id": ann.id })))
}

/// PATCH /ann/{ann_id}
pub async fn update_announcement(
    db: DbSession,
    AnnId(id): AnnId,
    ApiJson(body): ApiJson<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>, ApiError> {
    let mut session = db.lock().await;
    let ann = AnnouncementService::update(session.as_mut(), id, &body).await?;
    Ok(Json(ann))
}

/// DELETE /ann/{ann_id}
pub async fn delete_announcement(
    db: DbSession,
    AnnId(id): AnnId,
) -> Result<Json<Value>, ApiError> {
    let mut session = db.lock().await;
    AnnouncementService::delete(session.as_mut(), id).await?;
    tracing::info!("Deleted announcement {}", id);
    Ok(Json(json!({ "status": "deleted" })))
}

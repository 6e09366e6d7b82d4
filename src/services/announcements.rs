use crate::{
    db::Session,
    error::{ApiError, StoreError, UniqueConstraint},
    models::announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
};

const NOT_FOUND: &str = "your announcement not found";

pub struct AnnouncementService;

impl AnnouncementService {
    pub async fn get(session: &mut dyn Session, id: i64) -> Result<Announcement, ApiError> {
        session
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
    }

    pub async fn create(
        session: &mut dyn Session,
        req: &CreateAnnouncementRequest,
    ) -> Result<Announcement, ApiError> {
        // Ids outside the positive range could never be addressed by path again.
        if matches!(req.id, Some(id) if id <= 0) {
            return Err(ApiError::BadRequest("invalid announcement id".into()));
        }
        session.insert(req).await.map_err(|e| match e {
            StoreError::UniqueViolation { constraint } => {
                conflict(constraint, req.id, &req.owner)
            }
            other => other.into(),
        })
    }

    /// Looks the record up, overwrites the supplied fields and saves it.
    pub async fn update(
        session: &mut dyn Session,
        id: i64,
        req: &UpdateAnnouncementRequest,
    ) -> Result<Announcement, ApiError> {
        let mut ann = Self::get(session, id).await?;
        if req.is_empty() {
            return Ok(ann);
        }
        req.apply_to(&mut ann);

        session
            .update(&ann)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { constraint } => {
                    conflict(constraint, Some(id), &ann.owner)
                }
                other => other.into(),
            })?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete(session: &mut dyn Session, id: i64) -> Result<(), ApiError> {
        let ann = Self::get(session, id).await?;
        if !session.delete(ann.id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.into()));
        }
        Ok(())
    }
}

/// Names the value that clashed; `id` is `None` when storage generated it.
fn conflict(constraint: UniqueConstraint, id: Option<i64>, owner: &str) -> ApiError {
    let message = match (constraint, id) {
        (UniqueConstraint::Owner, _) => format!("Announcement with owner {} already exists", owner),
        (UniqueConstraint::Id, Some(id)) => format!("Announcement with id {} already exists", id),
        (UniqueConstraint::Id, None) => "Generated announcement id is already taken, retry the request".into(),
        (UniqueConstraint::Unknown, _) => "Announcement already exists".into(),
    };
    tracing::warn!("{}", message);
    ApiError::Conflict(message)
}

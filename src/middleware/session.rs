use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::{db::Session, error::ApiError, AppState};

/// The storage session opened for the current request.
///
/// Cloning shares the same session; it is never handed to another request.
#[derive(Clone)]
pub struct DbSession(Arc<Mutex<Box<dyn Session>>>);

impl DbSession {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, Box<dyn Session>> {
        self.0.lock().await
    }
}

/// Opens a fresh session for every request and attaches it to the request extensions.
///
/// The session lives in the request, so it is released as soon as the handler is done
/// with it, whether the handler returned an error or unwound.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = state.sessions.open().await?;
    req.extensions_mut().insert(DbSession::new(session));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for DbSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<DbSession>()
            .ok_or_else(|| ApiError::Internal("Session middleware not installed".into()))
    }
}

use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{LikeQueryParams, LikeRequest, LikeResponse, LikeStatusResponse},
    db_helpers::{get_like_status_in_db, toggle_like_in_db},
    errors::RequestError,
};

pub async fn toggle_like(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<LikeRequest>,
) -> Result<Json<LikeResponse>, RequestError> {
    let user = maybe_user.require()?;
    // The acting identity must be the token subject; nobody toggles likes
    // on someone else's behalf.
    if request.user_id != user.id {
        return Err(RequestError::Forbidden);
    }

    let (liked, likes) =
        toggle_like_in_db(&pool, request.prompt_id, user.id, request.action).await?;
    Ok(Json(LikeResponse {
        prompt_id: request.prompt_id,
        liked,
        likes,
    }))
}

pub async fn get_like_status(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<LikeQueryParams>,
) -> Result<Json<LikeStatusResponse>, RequestError> {
    let liked = get_like_status_in_db(&pool, params.prompt_id, params.user_id).await?;
    Ok(Json(LikeStatusResponse {
        prompt_id: params.prompt_id,
        liked,
    }))
}

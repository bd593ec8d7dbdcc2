use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{ProfileResponse, ProfileWrapper},
    db_helpers::{
        follow_user_in_db, get_follow_counts, get_user_by_username, is_following,
        unfollow_user_in_db,
    },
    errors::RequestError,
};

pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileWrapper>, RequestError> {
    let profile = match get_user_by_username(&pool, &username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    let following = match maybe_user.get_id() {
        Some(id) => is_following(&pool, id, profile.id).await?,
        None => false,
    };
    let (followers_count, following_count) = get_follow_counts(&pool, profile.id).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, following, followers_count, following_count),
    }))
}

pub async fn follow_profile(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileWrapper>, RequestError> {
    let user = maybe_user.require()?;
    let profile = follow_user_in_db(&pool, user.id, &username).await?;
    let (followers_count, following_count) = get_follow_counts(&pool, profile.id).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, true, followers_count, following_count),
    }))
}

pub async fn unfollow_profile(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileWrapper>, RequestError> {
    let user = maybe_user.require()?;
    let profile = unfollow_user_in_db(&pool, user.id, &username).await?;
    let (followers_count, following_count) = get_follow_counts(&pool, profile.id).await?;
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(profile, false, followers_count, following_count),
    }))
}

use sqlx::{Sqlite, SqlitePool};

use crate::errors::RequestError;
use crate::models::User;

use super::get_user_by_username;

pub async fn follow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<User, RequestError> {
    let followee = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    if followee.id == follower_id {
        return Err(RequestError::Validation(
            "cannot follow yourself".to_string(),
        ));
    }

    sqlx::query(
        "INSERT INTO follows (follower_id, followed_id) VALUES (?, ?) \
         ON CONFLICT (follower_id, followed_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(followee.id)
    .execute(pool)
    .await?;

    Ok(followee)
}

pub async fn unfollow_user_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    username: &str,
) -> Result<User, RequestError> {
    let followee = match get_user_by_username(pool, username).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };

    sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
        .bind(follower_id)
        .bind(followee.id)
        .execute(pool)
        .await?;

    Ok(followee)
}

pub async fn is_following(
    pool: &SqlitePool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, RequestError> {
    let following = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ? AND followed_id = ?)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;
    Ok(following != 0)
}

/// Follower and following totals, counted from the edges on demand.
pub async fn get_follow_counts(pool: &SqlitePool, user_id: i64) -> Result<(i64, i64), RequestError> {
    let followers =
        sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM follows WHERE followed_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let following =
        sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok((followers, following))
}

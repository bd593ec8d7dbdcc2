use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::LikeAction;
use crate::errors::RequestError;

/// Toggles the (prompt, user) like row and recomputes the denormalized
/// counter from the exact row count, all inside one transaction. The insert
/// is a no-op on conflict, so repeating an action is safe.
///
/// Returns whether the row exists after the toggle and the new count.
pub async fn toggle_like_in_db(
    pool: &SqlitePool,
    prompt_id: i64,
    user_id: i64,
    action: LikeAction,
) -> Result<(bool, i64), RequestError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM prompts WHERE id = ?")
        .bind(prompt_id)
        .fetch_one(&mut tx)
        .await?;
    if exists == 0 {
        return Err(RequestError::NotFound("Prompt not found"));
    }

    match action {
        LikeAction::Like => {
            sqlx::query(
                "INSERT INTO likes (prompt_id, user_id) VALUES (?, ?) \
                 ON CONFLICT (prompt_id, user_id) DO NOTHING",
            )
            .bind(prompt_id)
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        }
        LikeAction::Unlike => {
            sqlx::query("DELETE FROM likes WHERE prompt_id = ? AND user_id = ?")
                .bind(prompt_id)
                .bind(user_id)
                .execute(&mut tx)
                .await?;
        }
    }

    sqlx::query(
        "UPDATE prompts SET likes = (SELECT COUNT(*) FROM likes WHERE prompt_id = ?) \
         WHERE id = ?",
    )
    .bind(prompt_id)
    .bind(prompt_id)
    .execute(&mut tx)
    .await?;

    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT likes FROM prompts WHERE id = ?")
        .bind(prompt_id)
        .fetch_one(&mut tx)
        .await?;

    tx.commit().await?;
    Ok((action == LikeAction::Like, count))
}

pub async fn get_like_status_in_db(
    pool: &SqlitePool,
    prompt_id: i64,
    user_id: i64,
) -> Result<bool, RequestError> {
    let liked = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT EXISTS (SELECT 1 FROM likes WHERE prompt_id = ? AND user_id = ?)",
    )
    .bind(prompt_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(liked != 0)
}

pub async fn count_likes_for_prompt(
    pool: &SqlitePool,
    prompt_id: i64,
) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM likes WHERE prompt_id = ?")
        .bind(prompt_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_likes(pool: &SqlitePool) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM likes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

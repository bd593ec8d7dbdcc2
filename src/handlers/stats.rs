use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    data_formats::StatsResponse,
    db_helpers::{
        count_contact_messages, count_likes, count_prompts, count_prompts_by_status, count_users,
    },
    errors::RequestError,
    models::ApprovalStatus,
};

pub async fn get_stats(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> Result<Json<StatsResponse>, RequestError> {
    Ok(Json(StatsResponse {
        total_prompts: count_prompts(&pool).await?,
        pending: count_prompts_by_status(&pool, ApprovalStatus::Pending).await?,
        approved: count_prompts_by_status(&pool, ApprovalStatus::Approved).await?,
        rejected: count_prompts_by_status(&pool, ApprovalStatus::Rejected).await?,
        total_users: count_users(&pool).await?,
        total_likes: count_likes(&pool).await?,
        contact_messages: count_contact_messages(&pool).await?,
    }))
}

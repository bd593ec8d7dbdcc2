use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{
        CreatePromptRequest, MultiplePromptsWrapper, PromptQueryParams, PromptResponse,
        UpdatePromptRequest,
    },
    db_helpers::{
        delete_prompt_in_db, ensure_superadmin, get_prompt_by_id, get_user_by_id, insert_prompt_in_db,
        is_superadmin, list_prompts_in_db, update_prompt_in_db,
    },
    errors::RequestError,
    models::ApprovalStatus,
};

pub async fn list_prompts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Query(params): Query<PromptQueryParams>,
) -> Result<Json<MultiplePromptsWrapper>, RequestError> {
    // The public gallery only ever sees approved rows. Asking for any other
    // status is a moderation view.
    if params.status.is_some() && params.status != Some(ApprovalStatus::Approved) {
        let user = maybe_user.require()?;
        ensure_superadmin(&pool, user.id).await?;
    }
    let prompts = list_prompts_in_db(&pool, &params).await?;
    let prompts: Vec<PromptResponse> = prompts.into_iter().map(PromptResponse::from).collect();
    Ok(Json(MultiplePromptsWrapper {
        prompts_count: prompts.len(),
        prompts,
    }))
}

pub async fn get_prompt(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<PromptResponse>, RequestError> {
    let prompt = match get_prompt_by_id(&pool, id).await? {
        Some(prompt) => prompt,
        None => return Err(RequestError::NotFound("Prompt not found")),
    };
    // Same visibility rule as the listing: unapproved rows exist only for
    // their owner and for moderators. Everyone else gets a 404, which also
    // avoids confirming that a rejected id exists.
    if prompt.approval_status != ApprovalStatus::Approved {
        let visible = match maybe_user.get_id() {
            Some(viewer_id) => {
                prompt.user_id == Some(viewer_id) || is_superadmin(&pool, viewer_id).await?
            }
            None => false,
        };
        if !visible {
            return Err(RequestError::NotFound("Prompt not found"));
        }
    }
    Ok(Json(PromptResponse::from(prompt)))
}

pub async fn create_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<CreatePromptRequest>,
) -> Result<Json<PromptResponse>, RequestError> {
    let user = maybe_user.require()?;
    request.validate()?;

    let submitter = match get_user_by_id(&pool, user.id).await? {
        Some(submitter) => submitter,
        None => return Err(RequestError::NotAuthorized("Unknown user")),
    };
    let author = request
        .author
        .clone()
        .filter(|author| !author.trim().is_empty())
        .unwrap_or_else(|| submitter.username.clone());

    // Auto-approval for moderators is enforced here, not trusted from the
    // client: everyone else starts out pending.
    let status = if is_superadmin(&pool, user.id).await? {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Pending
    };

    let prompt = insert_prompt_in_db(&pool, Some(user.id), &author, status, &request).await?;
    Ok(Json(PromptResponse::from(prompt)))
}

pub async fn update_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePromptRequest>,
) -> Result<Json<PromptResponse>, RequestError> {
    let user = maybe_user.require()?;
    let prompt = update_prompt_in_db(&pool, id, user.id, request).await?;
    Ok(Json(PromptResponse::from(prompt)))
}

/// Owner-facing delete. Moderators go through the admin route instead.
pub async fn delete_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, RequestError> {
    let user = maybe_user.require()?;
    let prompt = match get_prompt_by_id(&pool, id).await? {
        Some(prompt) => prompt,
        None => return Err(RequestError::NotFound("Prompt not found")),
    };
    if prompt.user_id != Some(user.id) {
        return Err(RequestError::Forbidden);
    }
    delete_prompt_in_db(&pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

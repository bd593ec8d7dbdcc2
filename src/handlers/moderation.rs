use std::sync::Arc;

use axum::{extract::Path, http::HeaderMap, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    config::Config,
    data_formats::{AssignSuperAdminRequest, PromptResponse, RejectPromptRequest},
    db_helpers::{
        approve_prompt_in_db, assign_superadmin_in_db, delete_prompt_in_db, ensure_superadmin,
        get_user_by_id, reject_prompt_in_db,
    },
    email::MailerHandle,
    errors::RequestError,
    models::Prompt,
};

pub async fn approve_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(mailer): Extension<MailerHandle>,
    Path(id): Path<i64>,
) -> Result<Json<PromptResponse>, RequestError> {
    let reviewer = maybe_user.require()?;
    ensure_superadmin(&pool, reviewer.id).await?;

    let prompt = approve_prompt_in_db(&pool, id, reviewer.id).await?;
    notify_owner(
        &pool,
        &mailer,
        &prompt,
        "Your prompt was approved",
        &format!(
            "Good news: your prompt \"{}\" is now live in the gallery.",
            prompt.title
        ),
    )
    .await;
    Ok(Json(PromptResponse::from(prompt)))
}

pub async fn reject_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(mailer): Extension<MailerHandle>,
    Path(id): Path<i64>,
    Json(request): Json<RejectPromptRequest>,
) -> Result<Json<PromptResponse>, RequestError> {
    let reviewer = maybe_user.require()?;
    ensure_superadmin(&pool, reviewer.id).await?;

    let prompt = reject_prompt_in_db(&pool, id, reviewer.id, request.reason).await?;
    let body = match prompt.rejection_reason.as_deref() {
        Some(reason) if !reason.is_empty() => format!(
            "Your prompt \"{}\" was not accepted. Reviewer note: {}",
            prompt.title, reason
        ),
        _ => format!("Your prompt \"{}\" was not accepted.", prompt.title),
    };
    notify_owner(&pool, &mailer, &prompt, "Your prompt was not accepted", &body).await;
    Ok(Json(PromptResponse::from(prompt)))
}

pub async fn admin_delete_prompt(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, RequestError> {
    let reviewer = maybe_user.require()?;
    ensure_superadmin(&pool, reviewer.id).await?;
    delete_prompt_in_db(&pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn assign_superadmin(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
    Json(request): Json<AssignSuperAdminRequest>,
) -> Result<Json<serde_json::Value>, RequestError> {
    authorize_admin_call(&pool, &config, maybe_user, &headers).await?;
    let user = assign_superadmin_in_db(&pool, &request.email).await?;
    Ok(Json(
        serde_json::json!({ "assigned": user.username, "role": "superadmin" }),
    ))
}

/// Role assignment accepts either a SuperAdmin bearer token or the elevated
/// service credential. The service path hard-fails when the secret is not
/// configured instead of falling back to weaker checks.
async fn authorize_admin_call(
    pool: &SqlitePool,
    config: &Config,
    maybe_user: MaybeUser,
    headers: &HeaderMap,
) -> Result<(), RequestError> {
    if let Some(provided) = headers.get("X-Service-Key") {
        let expected = config
            .service_key
            .as_deref()
            .ok_or(RequestError::Misconfigured("SERVICE_KEY not set"))?;
        let provided = provided.to_str().map_err(|_| RequestError::Forbidden)?;
        if provided == expected {
            return Ok(());
        }
        return Err(RequestError::Forbidden);
    }
    let user = maybe_user.require()?;
    ensure_superadmin(pool, user.id).await
}

/// Best effort: a failed or skipped notification never fails the moderation
/// action itself.
async fn notify_owner(
    pool: &SqlitePool,
    mailer: &MailerHandle,
    prompt: &Prompt,
    subject: &str,
    body: &str,
) {
    let owner_id = match prompt.user_id {
        Some(owner_id) => owner_id,
        None => return,
    };
    match get_user_by_id(pool, owner_id).await {
        Ok(Some(owner)) => mailer.send_notification(&owner.email, subject, body),
        Ok(None) => {}
        Err(e) => tracing::warn!("could not load prompt owner for notification: {:?}", e),
    }
}

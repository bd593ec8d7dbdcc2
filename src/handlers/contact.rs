use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{ContactRequest, ContactResponse, ContactStatusRequest},
    db_helpers::{
        ensure_superadmin, insert_contact_message, list_contact_messages_in_db,
        update_contact_status_in_db,
    },
    email::MailerHandle,
    errors::RequestError,
    models::ContactStatus,
};

/// Unauthenticated submission from the public contact form.
pub async fn submit_contact_message(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, RequestError> {
    request.validate()?;
    let message = insert_contact_message(&pool, &request).await?;
    Ok(Json(ContactResponse::from(message)))
}

pub async fn list_contact_messages(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> Result<Json<Vec<ContactResponse>>, RequestError> {
    let user = maybe_user.require()?;
    ensure_superadmin(&pool, user.id).await?;
    let messages = list_contact_messages_in_db(&pool).await?;
    Ok(Json(messages.into_iter().map(ContactResponse::from).collect()))
}

pub async fn update_contact_status(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(mailer): Extension<MailerHandle>,
    Path(id): Path<i64>,
    Json(request): Json<ContactStatusRequest>,
) -> Result<Json<ContactResponse>, RequestError> {
    let user = maybe_user.require()?;
    ensure_superadmin(&pool, user.id).await?;

    let message = update_contact_status_in_db(&pool, id, request.status).await?;
    if message.status == ContactStatus::Replied {
        mailer.send_notification(
            &message.email,
            &format!("Re: {}", message.subject),
            "Thanks for reaching out. A moderator has replied to your message.",
        );
    }
    Ok(Json(ContactResponse::from(message)))
}

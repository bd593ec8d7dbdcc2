use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::ContactRequest;
use crate::errors::RequestError;
use crate::models::{ContactMessage, ContactStatus};

const CONTACT_COLUMNS: &str =
    "id, name, email, subject, message, category, status, created_at, updated_at";

pub async fn insert_contact_message(
    pool: &SqlitePool,
    request: &ContactRequest,
) -> Result<ContactMessage, RequestError> {
    let query = format!(
        "INSERT INTO contact_messages (name, email, subject, message, category) \
         VALUES (?, ?, ?, ?, ?) RETURNING {}",
        CONTACT_COLUMNS
    );
    let message = sqlx::query_as::<Sqlite, ContactMessage>(&query)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.subject)
        .bind(&request.message)
        .bind(&request.category)
        .fetch_one(pool)
        .await?;
    Ok(message)
}

pub async fn list_contact_messages_in_db(
    pool: &SqlitePool,
) -> Result<Vec<ContactMessage>, RequestError> {
    let query = format!(
        "SELECT {} FROM contact_messages ORDER BY created_at DESC",
        CONTACT_COLUMNS
    );
    let messages = sqlx::query_as::<Sqlite, ContactMessage>(&query)
        .fetch_all(pool)
        .await?;
    Ok(messages)
}

pub async fn update_contact_status_in_db(
    pool: &SqlitePool,
    id: i64,
    status: ContactStatus,
) -> Result<ContactMessage, RequestError> {
    let query = format!(
        "UPDATE contact_messages SET status = ?, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? RETURNING {}",
        CONTACT_COLUMNS
    );
    let message = sqlx::query_as::<Sqlite, ContactMessage>(&query)
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match message {
        Some(message) => Ok(message),
        None => Err(RequestError::NotFound("Contact message not found")),
    }
}

pub async fn count_contact_messages(pool: &SqlitePool) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM contact_messages")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

mod common;

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use onlyprompts::authentication::{AuthUser, MaybeUser};
use onlyprompts::data_formats::{ContactRequest, ContactStatusRequest};
use onlyprompts::db_helpers::count_contact_messages;
use onlyprompts::email::MailerHandle;
use onlyprompts::errors::RequestError;
use onlyprompts::handlers::{list_contact_messages, submit_contact_message, update_contact_status};
use onlyprompts::models::ContactStatus;

use common::{create_user, make_superadmin, setup_pool};

fn auth(id: i64) -> MaybeUser {
    MaybeUser(Some(AuthUser {
        id,
        token: String::new(),
    }))
}

fn sample_message() -> ContactRequest {
    ContactRequest {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        subject: "Broken image".to_string(),
        message: "The gallery thumbnail is missing.".to_string(),
        category: "bug".to_string(),
    }
}

#[tokio::test]
async fn invalid_email_is_rejected_before_any_row_is_written() {
    let pool = setup_pool().await;

    let request = ContactRequest {
        email: "not-an-email".to_string(),
        ..sample_message()
    };
    let result = submit_contact_message(Extension(Arc::new(pool.clone())), Json(request)).await;
    assert!(matches!(result, Err(RequestError::Validation(_))));
    assert_eq!(count_contact_messages(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn submission_is_stored_with_status_new() {
    let pool = setup_pool().await;

    let Json(stored) = submit_contact_message(Extension(Arc::new(pool.clone())), Json(sample_message()))
        .await
        .unwrap();
    assert_eq!(stored.status, ContactStatus::New);
    assert_eq!(count_contact_messages(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn listing_and_status_updates_require_superadmin() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice").await;
    let admin = create_user(&pool, "admin").await;
    make_superadmin(&pool, &admin).await;

    let Json(stored) = submit_contact_message(Extension(Arc::new(pool.clone())), Json(sample_message()))
        .await
        .unwrap();

    let denied = list_contact_messages(auth(user.id), Extension(Arc::new(pool.clone()))).await;
    assert!(matches!(denied, Err(RequestError::Forbidden)));

    let denied = update_contact_status(
        auth(user.id),
        Extension(Arc::new(pool.clone())),
        Extension(MailerHandle::default()),
        Path(stored.id),
        Json(ContactStatusRequest {
            status: ContactStatus::Read,
        }),
    )
    .await;
    assert!(matches!(denied, Err(RequestError::Forbidden)));

    let Json(messages) = list_contact_messages(auth(admin.id), Extension(Arc::new(pool.clone())))
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);

    let Json(updated) = update_contact_status(
        auth(admin.id),
        Extension(Arc::new(pool.clone())),
        Extension(MailerHandle::default()),
        Path(stored.id),
        Json(ContactStatusRequest {
            status: ContactStatus::Read,
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.status, ContactStatus::Read);
}

#[tokio::test]
async fn updating_a_missing_message_is_not_found() {
    let pool = setup_pool().await;
    let admin = create_user(&pool, "admin").await;
    make_superadmin(&pool, &admin).await;

    let result = update_contact_status(
        auth(admin.id),
        Extension(Arc::new(pool.clone())),
        Extension(MailerHandle::default()),
        Path(404),
        Json(ContactStatusRequest {
            status: ContactStatus::Closed,
        }),
    )
    .await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

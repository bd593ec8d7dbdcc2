#![allow(dead_code)]

use onlyprompts::data_formats::{CreatePromptRequest, RegisterRequest};
use onlyprompts::db_helpers::{assign_superadmin_in_db, insert_prompt_in_db, insert_user};
use onlyprompts::models::{ApprovalStatus, Prompt, User};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// One-connection in-memory database with migrations applied.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

/// Password is an opaque stub; these tests never log in through the API.
pub async fn create_user(pool: &SqlitePool, username: &str) -> User {
    insert_user(
        pool,
        &RegisterRequest {
            email: format!("{}@example.com", username),
            password: "argon2-hash-stub".to_string(),
            username: username.to_string(),
        },
    )
    .await
    .expect("failed to insert user")
}

pub async fn make_superadmin(pool: &SqlitePool, user: &User) {
    assign_superadmin_in_db(pool, &user.email)
        .await
        .expect("failed to assign superadmin");
}

pub fn sample_prompt(title: &str) -> CreatePromptRequest {
    CreatePromptRequest {
        title: title.to_string(),
        description: "d".to_string(),
        prompt: "a sunset over mountains".to_string(),
        category: "Art & Design".to_string(),
        tags: None,
        image: None,
        author: None,
    }
}

pub async fn seed_prompt(
    pool: &SqlitePool,
    user: &User,
    status: ApprovalStatus,
    title: &str,
) -> Prompt {
    insert_prompt_in_db(pool, Some(user.id), &user.username, status, &sample_prompt(title))
        .await
        .expect("failed to insert prompt")
}

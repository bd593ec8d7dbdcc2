pub mod authentication;
pub mod config;
pub mod data_formats;
pub mod db_helpers;
pub mod email;
pub mod errors;
pub mod generative;
pub mod handlers;
pub mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use config::Config;
use email::{Mailer, MailerHandle};
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{net::SocketAddr, sync::Arc};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Generous enough for the multipart image endpoints; individual parts are
/// still checked against the per-image ceiling.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub async fn run_app(address: SocketAddr, config: Config) -> Result<()> {
    let db = init_db(&config.database_url).await?;
    let mailer = match &config.smtp {
        Some(smtp) => MailerHandle(Some(Arc::new(Mailer::from_config(smtp)?))),
        None => MailerHandle(None),
    };
    let app = make_router()
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(config)))
        .layer(Extension(mailer))
        .layer(Extension(reqwest::Client::new()));
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    }
    let pool = SqlitePool::connect(db_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    Ok(pool)
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/users", post(register_user))
        .route("/api/users/login", post(login_user))
        .route("/api/user", get(get_current_user).put(update_user))
        .route("/api/profiles/:username", get(get_profile))
        .route(
            "/api/profiles/:username/follow",
            post(follow_profile).delete(unfollow_profile),
        )
        .route("/api/prompts", get(list_prompts).post(create_prompt))
        .route(
            "/api/prompts/:id",
            get(get_prompt).put(update_prompt).delete(delete_prompt),
        )
        .route("/api/admin/prompts/:id/approve", post(approve_prompt))
        .route("/api/admin/prompts/:id/reject", post(reject_prompt))
        .route("/api/admin/prompts/:id", delete(admin_delete_prompt))
        .route("/api/admin/assign-superadmin", post(assign_superadmin))
        .route("/api/likes", get(get_like_status).post(toggle_like))
        .route(
            "/api/contact",
            get(list_contact_messages).post(submit_contact_message),
        )
        .route("/api/contact/:id/status", patch(update_contact_status))
        .route("/api/generate-prompt", post(generate_prompt))
        .route("/api/generate-image", post(generate_image))
        .route("/api/upload", post(upload_image))
        .route("/api/upload-generated-image", post(upload_generated_image))
        .route("/api/stats", get(get_stats))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

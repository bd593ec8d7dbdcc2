use sqlx::{Sqlite, SqlitePool};

use crate::{
    authentication::hash_password_argon2,
    data_formats::{RegisterRequest, UpdateUserRequest},
    errors::RequestError,
    models::User,
};

use super::{get_user_by_email, get_user_by_id, UpdateBuilder, USER_COLUMNS};

const SUPERADMIN_ROLE: &str = "superadmin";

/// Expects the password to be hashed already.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    let query = format!(
        "INSERT INTO users (email, username, password) VALUES (?, ?, ?) RETURNING {}",
        USER_COLUMNS
    );
    let user = sqlx::query_as::<Sqlite, User>(&query)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password)
        .fetch_one(pool)
        .await?;
    Ok(user)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: i64,
    request: UpdateUserRequest,
) -> Result<User, RequestError> {
    let password = match request.password {
        Some(password) => Some(
            hash_password_argon2(password)
                .await
                .map_err(|_| RequestError::Upstream("Failed to hash password".to_string()))?,
        ),
        None => None,
    };

    let builder = UpdateBuilder::new()
        .set("email", request.email)
        .set("username", request.username)
        .set("password", password)
        .set("full_name", request.full_name)
        .set("bio", request.bio)
        .set("website", request.website)
        .set("location", request.location)
        .set("image", request.image);

    if !builder.is_empty() {
        let (fragment, params) = builder.build();
        let query = format!("UPDATE users SET {} WHERE id = ?", fragment);
        let mut result = sqlx::query(&query);
        for param in &params {
            result = result.bind(param.as_str());
        }
        result.bind(id).execute(pool).await?;
    }

    match get_user_by_id(pool, id).await? {
        Some(user) => Ok(user),
        None => Err(RequestError::NotFound("User not found")),
    }
}

// ----------------- Role markers -----------------

pub async fn is_superadmin(pool: &SqlitePool, user_id: i64) -> Result<bool, RequestError> {
    let held = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT EXISTS (SELECT 1 FROM roles WHERE user_id = ? AND role = ?)",
    )
    .bind(user_id)
    .bind(SUPERADMIN_ROLE)
    .fetch_one(pool)
    .await?;
    Ok(held != 0)
}

/// Gate for privileged endpoints: a valid identity without the marker gets
/// Forbidden before any mutation is attempted.
pub async fn ensure_superadmin(pool: &SqlitePool, user_id: i64) -> Result<(), RequestError> {
    if is_superadmin(pool, user_id).await? {
        Ok(())
    } else {
        Err(RequestError::Forbidden)
    }
}

pub async fn assign_superadmin_in_db(pool: &SqlitePool, email: &str) -> Result<User, RequestError> {
    let user = match get_user_by_email(pool, email).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    sqlx::query(
        "INSERT INTO roles (user_id, role) VALUES (?, ?) \
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user.id)
    .bind(SUPERADMIN_ROLE)
    .execute(pool)
    .await?;
    Ok(user)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

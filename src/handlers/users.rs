use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{
        get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser, MaybeUser,
    },
    data_formats::{
        is_valid_email, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse, UserWrapper,
    },
    db_helpers::{get_user_by_email, get_user_by_id, insert_user, update_user_in_db},
    errors::{is_unique_violation, RequestError},
};

type UserJson = UserWrapper<UserResponse>;

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> Result<Json<UserJson>, RequestError> {
    let user = get_user_by_email(&pool, &request.email).await?;
    let user = match user {
        Some(user) => user,
        None => return Err(RequestError::NotAuthorized("Invalid email or password")),
    };
    let is_password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::NotAuthorized("Invalid email or password"))?;
    if !is_password_correct {
        return Err(RequestError::NotAuthorized("Invalid email or password"));
    }

    let token = get_jwt_token(user.id)
        .map_err(|_| RequestError::Misconfigured("Could not generate token"))?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { mut user }): Json<UserWrapper<RegisterRequest>>,
) -> Result<Json<UserJson>, RequestError> {
    for (field, value) in [
        ("username", &user.username),
        ("email", &user.email),
        ("password", &user.password),
    ] {
        if value.trim().is_empty() {
            return Err(RequestError::Validation(format!("{} is required", field)));
        }
    }
    if !is_valid_email(&user.email) {
        return Err(RequestError::Validation(
            "email address is not valid".to_string(),
        ));
    }

    user.password = hash_password_argon2(user.password)
        .await
        .map_err(|_| RequestError::Upstream("Could not register user".to_string()))?;

    let created = insert_user(&pool, &user).await.map_err(|e| {
        if is_unique_violation(&e) {
            return RequestError::Validation("email or username already taken".to_string());
        }
        e
    })?;

    let token = get_jwt_token(created.id)
        .map_err(|_| RequestError::Misconfigured("Could not generate token"))?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        created, token,
    ))))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
) -> Result<Json<UserJson>, RequestError> {
    let AuthUser { id, token } = maybe_user.require()?;
    let user = match get_user_by_id(&pool, id).await? {
        Some(user) => user,
        None => return Err(RequestError::NotFound("User not found")),
    };
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn update_user(
    maybe_user: MaybeUser,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<UpdateUserRequest>>,
) -> Result<Json<UserJson>, RequestError> {
    let AuthUser { id, token } = maybe_user.require()?;
    if let Some(email) = &request.email {
        if !is_valid_email(email) {
            return Err(RequestError::Validation(
                "email address is not valid".to_string(),
            ));
        }
    }
    let user = update_user_in_db(&pool, id, request).await.map_err(|e| {
        if is_unique_violation(&e) {
            return RequestError::Validation("email or username already taken".to_string());
        }
        e
    })?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

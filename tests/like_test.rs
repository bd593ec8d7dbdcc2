mod common;

use std::sync::Arc;

use axum::{Extension, Json};
use onlyprompts::authentication::{AuthUser, MaybeUser};
use onlyprompts::data_formats::{LikeAction, LikeRequest};
use onlyprompts::db_helpers::{
    count_likes_for_prompt, get_like_status_in_db, get_prompt_by_id, toggle_like_in_db,
};
use onlyprompts::errors::RequestError;
use onlyprompts::handlers::toggle_like;
use onlyprompts::models::ApprovalStatus;

use common::{create_user, seed_prompt, setup_pool};

#[tokio::test]
async fn like_then_unlike_returns_to_the_original_state() {
    let pool = setup_pool().await;
    let author = create_user(&pool, "alice").await;
    let fan = create_user(&pool, "bob").await;
    let prompt = seed_prompt(&pool, &author, ApprovalStatus::Approved, "Sunset").await;

    let (liked, count) = toggle_like_in_db(&pool, prompt.id, fan.id, LikeAction::Like)
        .await
        .unwrap();
    assert!(liked);
    assert_eq!(count, 1);
    assert!(get_like_status_in_db(&pool, prompt.id, fan.id).await.unwrap());

    let (liked, count) = toggle_like_in_db(&pool, prompt.id, fan.id, LikeAction::Unlike)
        .await
        .unwrap();
    assert!(!liked);
    assert_eq!(count, 0);
    assert!(!get_like_status_in_db(&pool, prompt.id, fan.id).await.unwrap());
}

#[tokio::test]
async fn repeated_actions_are_idempotent() {
    let pool = setup_pool().await;
    let author = create_user(&pool, "alice").await;
    let fan = create_user(&pool, "bob").await;
    let prompt = seed_prompt(&pool, &author, ApprovalStatus::Approved, "Sunset").await;

    toggle_like_in_db(&pool, prompt.id, fan.id, LikeAction::Like)
        .await
        .unwrap();
    let (_, count) = toggle_like_in_db(&pool, prompt.id, fan.id, LikeAction::Like)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Unliking something never liked is a no-op, not an error.
    let other = create_user(&pool, "carol").await;
    let (_, count) = toggle_like_in_db(&pool, prompt.id, other.id, LikeAction::Unlike)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn denormalized_counter_matches_the_row_count() {
    let pool = setup_pool().await;
    let author = create_user(&pool, "alice").await;
    let prompt = seed_prompt(&pool, &author, ApprovalStatus::Approved, "Sunset").await;

    for fan_name in ["bob", "carol", "dave"] {
        let fan = create_user(&pool, fan_name).await;
        toggle_like_in_db(&pool, prompt.id, fan.id, LikeAction::Like)
            .await
            .unwrap();
    }

    let stored = get_prompt_by_id(&pool, prompt.id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 3);
    assert_eq!(
        stored.likes,
        count_likes_for_prompt(&pool, prompt.id).await.unwrap()
    );
}

#[tokio::test]
async fn liking_a_missing_prompt_is_not_found() {
    let pool = setup_pool().await;
    let fan = create_user(&pool, "bob").await;

    let result = toggle_like_in_db(&pool, 9999, fan.id, LikeAction::Like).await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn cross_user_like_requests_are_forbidden() {
    let pool = setup_pool().await;
    let author = create_user(&pool, "alice").await;
    let fan = create_user(&pool, "bob").await;
    let victim = create_user(&pool, "carol").await;
    let prompt = seed_prompt(&pool, &author, ApprovalStatus::Approved, "Sunset").await;

    let result = toggle_like(
        MaybeUser(Some(AuthUser {
            id: fan.id,
            token: String::new(),
        })),
        Extension(Arc::new(pool.clone())),
        Json(LikeRequest {
            prompt_id: prompt.id,
            user_id: victim.id,
            action: LikeAction::Like,
        }),
    )
    .await;
    assert!(matches!(result, Err(RequestError::Forbidden)));
    assert_eq!(count_likes_for_prompt(&pool, prompt.id).await.unwrap(), 0);
}

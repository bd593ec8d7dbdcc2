mod common;

use std::sync::Arc;

use axum::{extract::Path, Extension};
use onlyprompts::authentication::{AuthUser, MaybeUser};
use onlyprompts::db_helpers::{
    follow_user_in_db, get_follow_counts, is_following, unfollow_user_in_db,
};
use onlyprompts::errors::RequestError;
use onlyprompts::handlers::get_profile;

use common::{create_user, setup_pool};

#[tokio::test]
async fn follow_and_unfollow_update_the_edge_and_counts() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;

    follow_user_in_db(&pool, alice.id, "bob").await.unwrap();
    assert!(is_following(&pool, alice.id, bob.id).await.unwrap());

    let (followers, following) = get_follow_counts(&pool, bob.id).await.unwrap();
    assert_eq!((followers, following), (1, 0));
    let (followers, following) = get_follow_counts(&pool, alice.id).await.unwrap();
    assert_eq!((followers, following), (0, 1));

    unfollow_user_in_db(&pool, alice.id, "bob").await.unwrap();
    assert!(!is_following(&pool, alice.id, bob.id).await.unwrap());
    let (followers, _) = get_follow_counts(&pool, bob.id).await.unwrap();
    assert_eq!(followers, 0);
}

#[tokio::test]
async fn duplicate_follow_is_idempotent() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;

    follow_user_in_db(&pool, alice.id, "bob").await.unwrap();
    follow_user_in_db(&pool, alice.id, "bob").await.unwrap();

    let (followers, _) = get_follow_counts(&pool, bob.id).await.unwrap();
    assert_eq!(followers, 1);
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice").await;

    let result = follow_user_in_db(&pool, alice.id, "alice").await;
    assert!(matches!(result, Err(RequestError::Validation(_))));
}

#[tokio::test]
async fn following_a_missing_user_is_not_found() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice").await;

    let result = follow_user_in_db(&pool, alice.id, "ghost").await;
    assert!(matches!(result, Err(RequestError::NotFound(_))));
}

#[tokio::test]
async fn profile_reports_the_follow_state_of_the_viewer() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice").await;
    let _bob = create_user(&pool, "bob").await;
    follow_user_in_db(&pool, alice.id, "bob").await.unwrap();

    let axum::Json(wrapper) = get_profile(
        Extension(Arc::new(pool.clone())),
        MaybeUser(Some(AuthUser {
            id: alice.id,
            token: String::new(),
        })),
        Path("bob".to_string()),
    )
    .await
    .unwrap();
    assert!(wrapper.profile.following);
    assert_eq!(wrapper.profile.followers_count, 1);

    let axum::Json(anonymous) = get_profile(
        Extension(Arc::new(pool.clone())),
        MaybeUser(None),
        Path("bob".to_string()),
    )
    .await
    .unwrap();
    assert!(!anonymous.profile.following);
}

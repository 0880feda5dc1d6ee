//! Integration tests for role resolution


use openmusic_core::types::*;
use openmusic_storage::{access, collaborations};
use test_helpers::*;

#[tokio::test]
async fn test_roles_resolve_from_single_lookup() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let collaborator = create_test_user(pool, "bob").await;
    let stranger = create_test_user(pool, "eve").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;
    collaborations::add(pool, &playlist_id, &collaborator).await.unwrap();

    assert_eq!(
        access::resolve_role(pool, &playlist_id, &owner).await.unwrap(),
        Some(PlaylistRole::Owner)
    );
    assert_eq!(
        access::resolve_role(pool, &playlist_id, &collaborator).await.unwrap(),
        Some(PlaylistRole::Collaborator)
    );
    assert_eq!(
        access::resolve_role(pool, &playlist_id, &stranger).await.unwrap(),
        Some(PlaylistRole::None)
    );
}

#[tokio::test]
async fn test_missing_playlist_resolves_to_none() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user = create_test_user(pool, "alice").await;

    let role = access::resolve_role(pool, &PlaylistId::new("playlist-missing"), &user)
        .await
        .unwrap();
    assert!(role.is_none());
}

#[tokio::test]
async fn test_revoked_collaborator_loses_role() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let collaborator = create_test_user(pool, "bob").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;

    collaborations::add(pool, &playlist_id, &collaborator).await.unwrap();
    collaborations::remove(pool, &playlist_id, &collaborator).await.unwrap();

    assert_eq!(
        access::resolve_role(pool, &playlist_id, &collaborator).await.unwrap(),
        Some(PlaylistRole::None)
    );
}

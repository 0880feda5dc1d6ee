//! Integration tests for export snapshots


use openmusic_core::types::*;
use openmusic_storage::{exports, playlist_songs};
use test_helpers::*;

#[tokio::test]
async fn test_snapshot_contains_current_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let playlist_id = create_test_playlist(pool, "Road Trip", &owner).await;
    let song = create_test_song(pool, "Highway", "The Drivers").await;
    playlist_songs::add(pool, &playlist_id, &song, &owner).await.unwrap();

    let snapshot = exports::load_snapshot(pool, &playlist_id).await.unwrap().unwrap();

    assert_eq!(snapshot.playlist.id, playlist_id);
    assert_eq!(snapshot.playlist.name, "Road Trip");
    assert_eq!(snapshot.playlist.songs.len(), 1);
    assert_eq!(snapshot.playlist.songs[0].performer, "The Drivers");
}

#[tokio::test]
async fn test_snapshot_of_deleted_playlist_is_none() {
    let test_db = TestDb::new().await;
    let snapshot = exports::load_snapshot(test_db.pool(), &PlaylistId::new("playlist-gone"))
        .await
        .unwrap();
    assert!(snapshot.is_none());
}

#[tokio::test]
async fn test_recipient_falls_back_to_requester_email() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let with_email = create_test_user_with_email(pool, "alice", "alice@example.com").await;
    let without_email = create_test_user(pool, "bob").await;
    let playlist_id = PlaylistId::new("playlist-1");

    let explicit = ExportJob::new(playlist_id.clone(), without_email.clone(), Some("x@example.com".into()));
    assert_eq!(
        exports::resolve_recipient(pool, &explicit).await.unwrap().as_deref(),
        Some("x@example.com")
    );

    let fallback = ExportJob::new(playlist_id.clone(), with_email, None);
    assert_eq!(
        exports::resolve_recipient(pool, &fallback).await.unwrap().as_deref(),
        Some("alice@example.com")
    );

    let nobody = ExportJob::new(playlist_id, without_email, None);
    assert!(exports::resolve_recipient(pool, &nobody).await.unwrap().is_none());
}

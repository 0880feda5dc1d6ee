//! Integration tests for playlist membership and the activity trail


use openmusic_core::{types::*, MusicError};
use openmusic_storage::{activities, playlist_songs, playlists};
use test_helpers::*;

#[tokio::test]
async fn test_add_song_records_link_and_activity_together() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;
    let song = create_test_song(pool, "Song", "Band").await;

    let link_id = playlist_songs::add(pool, &playlist_id, &song, &owner)
        .await
        .expect("Failed to add song");
    assert!(link_id.starts_with("ps-"));

    assert_eq!(count_rows(pool, "playlist_song_links", &playlist_id).await, 1);

    let activity = activities::list_for_playlist(pool, &playlist_id).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].action, ActivityAction::Add);
    assert_eq!(activity[0].username, "alice");
    assert_eq!(activity[0].title, "Song");
}

#[tokio::test]
async fn test_duplicate_add_is_conflict_and_leaves_one_link() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;
    let song = create_test_song(pool, "Song", "Band").await;

    playlist_songs::add(pool, &playlist_id, &song, &owner).await.unwrap();
    let second = playlist_songs::add(pool, &playlist_id, &song, &owner).await;

    assert!(matches!(second, Err(MusicError::Conflict(_))));
    assert_eq!(count_rows(pool, "playlist_song_links", &playlist_id).await, 1);
    // The failed add must not leave an orphan activity behind
    assert_eq!(count_rows(pool, "playlist_song_activities", &playlist_id).await, 1);
}

#[tokio::test]
async fn test_remove_missing_link_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;
    let song = create_test_song(pool, "Song", "Band").await;

    let result = playlist_songs::remove(pool, &playlist_id, &song, &owner).await;

    match result {
        Err(MusicError::NotFound(msg)) => assert!(msg.contains("playlist")),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(count_rows(pool, "playlist_song_activities", &playlist_id).await, 0);
}

#[tokio::test]
async fn test_activities_are_ordered_oldest_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let owner = create_test_user(pool, "alice").await;
    let helper = create_test_user(pool, "bob").await;
    let playlist_id = create_test_playlist(pool, "Mix", &owner).await;
    let first = create_test_song(pool, "First", "Band").await;
    let second = create_test_song(pool, "Second", "Band").await;

    playlist_songs::add(pool, &playlist_id, &first, &owner).await.unwrap();
    playlist_songs::add(pool, &playlist_id, &second, &helper).await.unwrap();
    playlist_songs::remove(pool, &playlist_id, &first, &helper).await.unwrap();

    let activity = activities::list_for_playlist(pool, &playlist_id).await.unwrap();
    let summary: Vec<_> = activity
        .iter()
        .map(|a| (a.username.as_str(), a.title.as_str(), a.action))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("alice", "First", ActivityAction::Add),
            ("bob", "Second", ActivityAction::Add),
            ("bob", "First", ActivityAction::Delete),
        ]
    );
    assert!(activity.windows(2).all(|w| w[0].time <= w[1].time));

    let detail = playlists::get_detail(pool, &playlist_id).await.unwrap().unwrap();
    assert_eq!(detail.songs.len(), 1);
    assert_eq!(detail.songs[0].id, second);
}

//! Integration tests for the Store and Query Engine contract
//!
//! Tests cover:
//! - Read-your-writes
//! - Idempotent delete
//! - Referential creation check
//! - Dangling reference tolerance
//! - Statistics correctness
//! - Concurrent mutation safety

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use streamcat_common::{
    Catalog, CatalogError, ErrorKind, NewPlaylist, NewSong, NewUser, PlaylistOps, QueryOps,
    SongOps, Store, UserOps,
};

fn user(store: &Store, name: &str) -> String {
    store
        .create_user(NewUser {
            name: name.to_string(),
            age: 25,
        })
        .unwrap()
        .id
}

fn song(store: &Store, name: &str) -> String {
    store
        .create_song(NewSong {
            name: name.to_string(),
            artist: "Band".to_string(),
            duration_seconds: 180,
        })
        .unwrap()
        .id
}

fn playlist(store: &Store, owner: &str, songs: Vec<String>) -> String {
    store
        .create_playlist(NewPlaylist {
            name: "Mix".to_string(),
            owner_id: owner.to_string(),
            song_ids: songs,
        })
        .unwrap()
        .id
}

#[test]
fn test_read_your_writes() {
    let store = Store::default();
    let created = store
        .create_user(NewUser {
            name: "Ana".to_string(),
            age: 30,
        })
        .unwrap();

    let fetched = store.get_user(&created.id).unwrap();
    assert_eq!(fetched.name, "Ana");
    assert_eq!(fetched.age, 30);
}

#[test]
fn test_idempotent_delete() {
    let store = Store::default();
    let id = user(&store, "Ana");

    assert!(store.delete_user(&id).unwrap());
    assert!(!store.delete_user(&id).unwrap());

    let err = store.get_user(&id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_referential_creation_check() {
    let store = Store::default();
    let before = store.list_playlists().unwrap().len();

    let err = store
        .create_playlist(NewPlaylist {
            name: "P1".to_string(),
            owner_id: "nonexistent".to_string(),
            song_ids: vec![],
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Referential);
    assert_eq!(err.field(), Some("owner_id"));
    assert_eq!(store.list_playlists().unwrap().len(), before);
}

#[test]
fn test_dangling_reference_tolerance() {
    let store = Store::default();
    let owner = user(&store, "Ana");
    let s1 = song(&store, "S1");
    let s2 = song(&store, "S2");
    let p = playlist(&store, &owner, vec![s1.clone(), s2.clone()]);

    assert!(store.delete_song(&s1).unwrap());

    let songs = store.songs_of_playlist(&p).unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].id, s2);

    // The playlist itself keeps the dangling id
    assert_eq!(store.get_playlist(&p).unwrap().song_ids, vec![s1.clone(), s2]);
    assert!(store.playlists_containing_song(&s1).unwrap().is_empty());
}

#[test]
fn test_statistics_empty_catalog() {
    let store = Store::default();
    let stats = store.statistics().unwrap();
    assert_eq!(stats.total_playlists, 0);
    assert_eq!(stats.avg_songs_per_playlist, 0.0);
    assert_eq!(stats.avg_playlists_per_user, 0.0);
}

#[test]
fn test_statistics_average() {
    let store = Store::default();
    let owner = user(&store, "Ana");
    let songs: Vec<String> = (0..6).map(|i| song(&store, &format!("S{}", i))).collect();

    playlist(&store, &owner, songs[..2].to_vec());
    playlist(&store, &owner, songs[..4].to_vec());
    playlist(&store, &owner, songs.clone());

    let stats = store.statistics().unwrap();
    assert_eq!(stats.total_playlists, 3);
    assert_eq!(stats.avg_songs_per_playlist, 4.0);
}

#[test]
fn test_playlists_of_user_tracks_deletes() {
    let store = Store::default();
    let ana = user(&store, "Ana");
    let bia = user(&store, "Bia");
    let p1 = playlist(&store, &ana, vec![]);
    let p2 = playlist(&store, &bia, vec![]);
    let p3 = playlist(&store, &ana, vec![]);

    let ids: Vec<String> = store
        .playlists_of_user(&ana)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![p1.clone(), p3.clone()]);

    store.delete_playlist(&p1).unwrap();
    assert_eq!(store.playlists_of_user(&ana).unwrap().len(), 1);

    store.delete_user(&bia).unwrap();
    assert!(store.playlists_of_user(&bia).unwrap().is_empty());
    assert!(store.get_playlist(&p2).is_ok());

    store.verify_indexes().unwrap();
}

#[test]
fn test_concurrent_song_creation() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let store = Arc::new(Store::default());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|i| {
                        store
                            .create_song(NewSong {
                                name: format!("Song {}-{}", t, i),
                                artist: format!("Artist {}", t),
                                duration_seconds: 60 + i as i64,
                            })
                            .unwrap()
                            .id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate song id");
        }
    }

    assert_eq!(ids.len(), THREADS * PER_THREAD);
    let listed = store.list_songs().unwrap();
    assert_eq!(listed.len(), THREADS * PER_THREAD);
    assert!(listed.iter().all(|s| ids.contains(&s.id)));
}

#[test]
fn test_concurrent_mixed_mutations_keep_indexes_consistent() {
    let store = Arc::new(Store::default());
    let owner = user(&store, "Ana");
    let seed_songs: Vec<String> = (0..10).map(|i| song(&store, &format!("S{}", i))).collect();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            let owner = owner.clone();
            let seed_songs = seed_songs.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let p = playlist(&store, &owner, seed_songs[..(i % 10)].to_vec());
                    if i % 3 == 0 {
                        store.delete_playlist(&p).unwrap();
                    }
                    if t == 0 && i < seed_songs.len() {
                        store.delete_song(&seed_songs[i]).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    store.verify_indexes().unwrap();
}

#[test]
fn test_store_usable_as_trait_object() {
    let catalog: Arc<dyn Catalog> = Arc::new(Store::default());
    let id = catalog
        .create_user(NewUser {
            name: "Ana".to_string(),
            age: 30,
        })
        .unwrap()
        .id;
    assert_eq!(catalog.list_users().unwrap().len(), 1);

    let err = catalog.songs_of_playlist(&id).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

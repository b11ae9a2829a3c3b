//! Integration tests for the gRPC adapter
//!
//! Unary RPCs are called directly on the service implementation. `StreamSongs` needs a real
//! transport, so that test serves on an ephemeral port and connects the generated client.

use streamcat_common::Store;
use streamcat_server::grpc::proto;
use streamcat_server::grpc::{CatalogGrpc, CatalogService, CatalogServiceClient};
use streamcat_server::server::serve_grpc;
use streamcat_server::AppState;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::{Code, Request};

fn service() -> CatalogGrpc {
    CatalogGrpc::new(AppState::from_store(Store::default()))
}

async fn create_user(svc: &CatalogGrpc, name: &str) -> proto::User {
    svc.create_user(Request::new(proto::CreateUserRequest {
        name: name.to_string(),
        age: 30,
    }))
    .await
    .unwrap()
    .into_inner()
}

async fn create_song(svc: &CatalogGrpc, name: &str) -> proto::Song {
    svc.create_song(Request::new(proto::CreateSongRequest {
        name: name.to_string(),
        artist: "Band".to_string(),
        duration_seconds: 180,
    }))
    .await
    .unwrap()
    .into_inner()
}

#[tokio::test]
async fn test_user_roundtrip() {
    let svc = service();
    let created = create_user(&svc, "Ana").await;

    let fetched = svc
        .get_user(Request::new(proto::IdRequest {
            id: created.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, created);

    let updated = svc
        .update_user(Request::new(proto::UpdateUserRequest {
            id: created.id.clone(),
            name: None,
            age: Some(31),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.age, 31);
}

#[tokio::test]
async fn test_status_codes() {
    let svc = service();

    let status = svc
        .get_song(Request::new(proto::IdRequest {
            id: "ghost".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = svc
        .create_user(Request::new(proto::CreateUserRequest {
            name: "Ana".to_string(),
            age: -3,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = svc
        .create_playlist(Request::new(proto::CreatePlaylistRequest {
            name: "Mix".to_string(),
            owner_id: "ghost".to_string(),
            song_ids: vec![],
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::FailedPrecondition);
}

#[tokio::test]
async fn test_update_playlist_song_list_presence() {
    let svc = service();
    let owner = create_user(&svc, "Ana").await;
    let song = create_song(&svc, "One").await;

    let playlist = svc
        .create_playlist(Request::new(proto::CreatePlaylistRequest {
            name: "Mix".to_string(),
            owner_id: owner.id.clone(),
            song_ids: vec![song.id.clone()],
        }))
        .await
        .unwrap()
        .into_inner();

    // Absent wrapper leaves the list alone
    let renamed = svc
        .update_playlist(Request::new(proto::UpdatePlaylistRequest {
            id: playlist.id.clone(),
            name: Some("Renamed".to_string()),
            owner_id: None,
            song_ids: None,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(renamed.song_ids, vec![song.id.clone()]);

    // Present but empty wrapper clears it
    let cleared = svc
        .update_playlist(Request::new(proto::UpdatePlaylistRequest {
            id: playlist.id.clone(),
            name: None,
            owner_id: None,
            song_ids: Some(proto::SongIdList { ids: vec![] }),
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(cleared.song_ids.is_empty());
    assert_eq!(cleared.name, "Renamed");
}

#[tokio::test]
async fn test_queries_and_statistics() {
    let svc = service();
    let owner = create_user(&svc, "Ana").await;
    let s1 = create_song(&svc, "One").await;
    let s2 = create_song(&svc, "Two").await;

    let playlist = svc
        .create_playlist(Request::new(proto::CreatePlaylistRequest {
            name: "Mix".to_string(),
            owner_id: owner.id.clone(),
            song_ids: vec![s1.id.clone(), s2.id.clone(), s1.id.clone()],
        }))
        .await
        .unwrap()
        .into_inner();

    let owned = svc
        .playlists_of_user(Request::new(proto::UserRequest {
            user_id: owner.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(owned.playlists, vec![playlist.clone()]);

    let containing = svc
        .playlists_containing_song(Request::new(proto::SongRequest {
            song_id: s1.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(containing.playlists.len(), 1);

    let songs = svc
        .songs_of_playlist(Request::new(proto::PlaylistRequest {
            playlist_id: playlist.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(songs.songs, vec![s1.clone(), s2.clone(), s1.clone()]);

    let details = svc
        .playlist_details(Request::new(proto::IdRequest {
            id: playlist.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(details.owner, Some(owner));
    assert_eq!(details.playlist, Some(playlist));

    let stats = svc
        .statistics(Request::new(proto::Empty {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(stats.total_songs, 2);
    assert_eq!(stats.avg_songs_per_playlist, 3.0);
    assert_eq!(stats.users_with_playlists, 1);

    let deleted = svc
        .delete_song(Request::new(proto::IdRequest { id: s2.id }))
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.deleted);
}

#[tokio::test]
async fn test_stream_songs_over_transport() {
    let state = AppState::from_store(Store::default());
    let svc = CatalogGrpc::new(state.clone());
    let one = create_song(&svc, "One").await;
    let two = create_song(&svc, "Two").await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(serve_grpc(listener, state, async {
        let _ = stopped.await;
    }));

    let mut client = CatalogServiceClient::connect(format!("http://{}", addr))
        .await
        .unwrap();

    let requests = vec![
        proto::SongRequest {
            song_id: one.id.clone(),
        },
        proto::SongRequest {
            song_id: "ghost".to_string(),
        },
        proto::SongRequest {
            song_id: two.id.clone(),
        },
    ];
    let mut inbound = client
        .stream_songs(tokio_stream::iter(requests))
        .await
        .unwrap()
        .into_inner();

    let mut received = Vec::new();
    while let Some(song) = inbound.message().await.unwrap() {
        received.push(song.name);
    }
    assert_eq!(received, vec!["One", "Two"]);

    // The unary path works over the same transport
    let list = client
        .list_songs(proto::Empty {})
        .await
        .unwrap()
        .into_inner();
    assert_eq!(list.songs.len(), 2);

    drop(client);
    let _ = stop.send(());
    server.await.unwrap().unwrap();
}

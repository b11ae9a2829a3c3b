//! Build script for streamcat-server
//!
//! - Captures build identification (git hash, timestamp, profile)
//! - Generates the gRPC service and client code for `streamcat.CatalogService`. Message types are
//!   hand-written prost structs in `src/grpc/proto.rs`, so no `protoc` is required.

use std::process::Command;

use tonic_build::manual::{Builder, Method, Service};

const PROTO: &str = "crate::grpc::proto";

/// `(method, route, input, output)` for every unary RPC
const UNARY: &[(&str, &str, &str, &str)] = &[
    ("get_user", "GetUser", "IdRequest", "User"),
    ("list_users", "ListUsers", "Empty", "UserList"),
    ("create_user", "CreateUser", "CreateUserRequest", "User"),
    ("update_user", "UpdateUser", "UpdateUserRequest", "User"),
    ("delete_user", "DeleteUser", "IdRequest", "DeleteResponse"),
    ("get_song", "GetSong", "IdRequest", "Song"),
    ("list_songs", "ListSongs", "Empty", "SongList"),
    ("create_song", "CreateSong", "CreateSongRequest", "Song"),
    ("update_song", "UpdateSong", "UpdateSongRequest", "Song"),
    ("delete_song", "DeleteSong", "IdRequest", "DeleteResponse"),
    ("get_playlist", "GetPlaylist", "IdRequest", "Playlist"),
    ("list_playlists", "ListPlaylists", "Empty", "PlaylistList"),
    ("create_playlist", "CreatePlaylist", "CreatePlaylistRequest", "Playlist"),
    ("update_playlist", "UpdatePlaylist", "UpdatePlaylistRequest", "Playlist"),
    ("delete_playlist", "DeletePlaylist", "IdRequest", "DeleteResponse"),
    ("playlists_of_user", "PlaylistsOfUser", "UserRequest", "PlaylistList"),
    ("songs_of_playlist", "SongsOfPlaylist", "PlaylistRequest", "SongList"),
    (
        "playlists_containing_song",
        "PlaylistsContainingSong",
        "SongRequest",
        "PlaylistList",
    ),
    ("playlist_details", "PlaylistDetails", "IdRequest", "PlaylistDetails"),
    ("statistics", "Statistics", "Empty", "Statistics"),
];

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::MethodBuilder {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("{}::{}", PROTO, input))
        .output_type(format!("{}::{}", PROTO, output))
        .codec_path("tonic::codec::ProstCodec")
}

fn main() {
    // Capture git commit hash (short form, 8 characters)
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Capture build timestamp in ISO 8601 format
    let build_timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);

    let mut service = Service::builder()
        .name("CatalogService")
        .package("streamcat");
    for (name, route, input, output) in UNARY {
        service = service.method(method(name, route, input, output).build());
    }
    let service = service
        .method(
            method("stream_songs", "StreamSongs", "SongRequest", "Song")
                .client_streaming()
                .server_streaming()
                .build(),
        )
        .build();

    Builder::new().compile(&[service]);
}

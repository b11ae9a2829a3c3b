//! Protobuf messages for `streamcat.CatalogService`
//!
//! The service traits, server and client are generated by build.rs into
//! `catalog_service_server` / `catalog_service_client` below.

use streamcat_common::model;

include!(concat!(env!("OUT_DIR"), "/streamcat.CatalogService.rs"));

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Empty {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IdRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UserRequest {
    #[prost(string, tag = "1")]
    pub user_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PlaylistRequest {
    #[prost(string, tag = "1")]
    pub playlist_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SongRequest {
    #[prost(string, tag = "1")]
    pub song_id: String,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct DeleteResponse {
    #[prost(bool, tag = "1")]
    pub deleted: bool,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(uint32, tag = "3")]
    pub age: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UserList {
    #[prost(message, repeated, tag = "1")]
    pub users: Vec<User>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateUserRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int64, tag = "2")]
    pub age: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateUserRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(int64, optional, tag = "3")]
    pub age: Option<i64>,
}

// ============================================================================
// Songs
// ============================================================================

#[derive(Clone, PartialEq, prost::Message)]
pub struct Song {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub artist: String,
    #[prost(uint32, tag = "4")]
    pub duration_seconds: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SongList {
    #[prost(message, repeated, tag = "1")]
    pub songs: Vec<Song>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateSongRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub artist: String,
    #[prost(int64, tag = "3")]
    pub duration_seconds: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateSongRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub artist: Option<String>,
    #[prost(int64, optional, tag = "4")]
    pub duration_seconds: Option<i64>,
}

// ============================================================================
// Playlists
// ============================================================================

#[derive(Clone, PartialEq, prost::Message)]
pub struct Playlist {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub owner_id: String,
    #[prost(string, repeated, tag = "4")]
    pub song_ids: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PlaylistList {
    #[prost(message, repeated, tag = "1")]
    pub playlists: Vec<Playlist>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreatePlaylistRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub owner_id: String,
    #[prost(string, repeated, tag = "3")]
    pub song_ids: Vec<String>,
}

/// Wrapper so an update can tell "replace with an empty list" from "leave unchanged"
#[derive(Clone, PartialEq, prost::Message)]
pub struct SongIdList {
    #[prost(string, repeated, tag = "1")]
    pub ids: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdatePlaylistRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub owner_id: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub song_ids: Option<SongIdList>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PlaylistDetails {
    #[prost(message, optional, tag = "1")]
    pub playlist: Option<Playlist>,
    #[prost(message, optional, tag = "2")]
    pub owner: Option<User>,
    #[prost(message, repeated, tag = "3")]
    pub songs: Vec<Song>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Statistics {
    #[prost(uint64, tag = "1")]
    pub total_users: u64,
    #[prost(uint64, tag = "2")]
    pub total_songs: u64,
    #[prost(uint64, tag = "3")]
    pub total_playlists: u64,
    #[prost(double, tag = "4")]
    pub avg_songs_per_playlist: f64,
    #[prost(uint64, tag = "5")]
    pub users_with_playlists: u64,
    #[prost(double, tag = "6")]
    pub avg_playlists_per_user: f64,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<model::User> for User {
    fn from(user: model::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            age: user.age,
        }
    }
}

impl From<model::Song> for Song {
    fn from(song: model::Song) -> Self {
        Self {
            id: song.id,
            name: song.name,
            artist: song.artist,
            duration_seconds: song.duration_seconds,
        }
    }
}

impl From<model::Playlist> for Playlist {
    fn from(playlist: model::Playlist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            owner_id: playlist.owner_id,
            song_ids: playlist.song_ids,
        }
    }
}

impl From<model::PlaylistDetails> for PlaylistDetails {
    fn from(details: model::PlaylistDetails) -> Self {
        Self {
            playlist: Some(details.playlist.into()),
            owner: details.owner.map(User::from),
            songs: details.songs.into_iter().map(Song::from).collect(),
        }
    }
}

impl From<model::Statistics> for Statistics {
    fn from(stats: model::Statistics) -> Self {
        Self {
            total_users: stats.total_users as u64,
            total_songs: stats.total_songs as u64,
            total_playlists: stats.total_playlists as u64,
            avg_songs_per_playlist: stats.avg_songs_per_playlist,
            users_with_playlists: stats.users_with_playlists as u64,
            avg_playlists_per_user: stats.avg_playlists_per_user,
        }
    }
}

impl From<CreateUserRequest> for model::NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            age: req.age,
        }
    }
}

impl From<CreateSongRequest> for model::NewSong {
    fn from(req: CreateSongRequest) -> Self {
        Self {
            name: req.name,
            artist: req.artist,
            duration_seconds: req.duration_seconds,
        }
    }
}

impl From<CreatePlaylistRequest> for model::NewPlaylist {
    fn from(req: CreatePlaylistRequest) -> Self {
        Self {
            name: req.name,
            owner_id: req.owner_id,
            song_ids: req.song_ids,
        }
    }
}

impl UpdateUserRequest {
    pub fn into_parts(self) -> (String, model::UserPatch) {
        let patch = model::UserPatch {
            name: self.name,
            age: self.age,
        };
        (self.id, patch)
    }
}

impl UpdateSongRequest {
    pub fn into_parts(self) -> (String, model::SongPatch) {
        let patch = model::SongPatch {
            name: self.name,
            artist: self.artist,
            duration_seconds: self.duration_seconds,
        };
        (self.id, patch)
    }
}

impl UpdatePlaylistRequest {
    pub fn into_parts(self) -> (String, model::PlaylistPatch) {
        let patch = model::PlaylistPatch {
            name: self.name,
            owner_id: self.owner_id,
            song_ids: self.song_ids.map(|list| list.ids),
        };
        (self.id, patch)
    }
}

//! Capability traits consumed by protocol adapters
//!
//! Adapters hold an `Arc<dyn Catalog>` and only translate between their wire shapes and these
//! calls. Every method is atomic with respect to concurrent callers.

use crate::error::CatalogResult;
use crate::model::{
    NewPlaylist, NewSong, NewUser, Playlist, PlaylistDetails, PlaylistPatch, Song, SongPatch,
    Statistics, User, UserPatch,
};

pub trait UserOps {
    fn get_user(&self, id: &str) -> CatalogResult<User>;
    /// All users in insertion order
    fn list_users(&self) -> CatalogResult<Vec<User>>;
    fn create_user(&self, input: NewUser) -> CatalogResult<User>;
    fn update_user(&self, id: &str, patch: UserPatch) -> CatalogResult<User>;
    /// `false` when the user was already absent
    fn delete_user(&self, id: &str) -> CatalogResult<bool>;
}

pub trait SongOps {
    fn get_song(&self, id: &str) -> CatalogResult<Song>;
    fn list_songs(&self) -> CatalogResult<Vec<Song>>;
    fn create_song(&self, input: NewSong) -> CatalogResult<Song>;
    fn update_song(&self, id: &str, patch: SongPatch) -> CatalogResult<Song>;
    fn delete_song(&self, id: &str) -> CatalogResult<bool>;
}

pub trait PlaylistOps {
    fn get_playlist(&self, id: &str) -> CatalogResult<Playlist>;
    fn list_playlists(&self) -> CatalogResult<Vec<Playlist>>;
    /// Fails with `Referential` when the owner does not exist
    fn create_playlist(&self, input: NewPlaylist) -> CatalogResult<Playlist>;
    fn update_playlist(&self, id: &str, patch: PlaylistPatch) -> CatalogResult<Playlist>;
    fn delete_playlist(&self, id: &str) -> CatalogResult<bool>;
}

/// Derived read-only views
pub trait QueryOps {
    /// Empty when the user owns nothing or does not exist
    fn playlists_of_user(&self, user_id: &str) -> CatalogResult<Vec<Playlist>>;
    /// `NotFound` for an unknown playlist; dangling song ids are skipped
    fn songs_of_playlist(&self, playlist_id: &str) -> CatalogResult<Vec<Song>>;
    fn playlists_containing_song(&self, song_id: &str) -> CatalogResult<Vec<Playlist>>;
    fn playlist_details(&self, playlist_id: &str) -> CatalogResult<PlaylistDetails>;
    fn statistics(&self) -> CatalogResult<Statistics>;
}

/// Full capability set handed to every adapter
pub trait Catalog: UserOps + SongOps + PlaylistOps + QueryOps + Send + Sync {}

impl<T> Catalog for T where T: UserOps + SongOps + PlaylistOps + QueryOps + Send + Sync {}

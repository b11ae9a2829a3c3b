//! Catalog entities and operation inputs
//!
//! Field names here are the canonical ones. Adapters rename at their own boundary.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// Longest accepted name-like field, in characters
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Ordered; duplicates allowed; entries may dangle
    pub song_ids: Vec<String>,
}

/// Input for `create_user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
}

/// Input for `create_song`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
    pub name: String,
    pub artist: String,
    pub duration_seconds: i64,
}

/// Input for `create_playlist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylist {
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub song_ids: Vec<String>,
}

/// Partial update for a user; `None` keeps the prior value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPatch {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub duration_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistPatch {
    pub name: Option<String>,
    pub owner_id: Option<String>,
    pub song_ids: Option<Vec<String>>,
}

impl From<NewUser> for UserPatch {
    fn from(input: NewUser) -> Self {
        UserPatch {
            name: Some(input.name),
            age: Some(input.age),
        }
    }
}

impl From<NewSong> for SongPatch {
    fn from(input: NewSong) -> Self {
        SongPatch {
            name: Some(input.name),
            artist: Some(input.artist),
            duration_seconds: Some(input.duration_seconds),
        }
    }
}

impl From<NewPlaylist> for PlaylistPatch {
    fn from(input: NewPlaylist) -> Self {
        PlaylistPatch {
            name: Some(input.name),
            owner_id: Some(input.owner_id),
            song_ids: Some(input.song_ids),
        }
    }
}

/// Playlist with its owner and resolved songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetails {
    pub playlist: Playlist,
    /// `None` when the owner has been deleted
    pub owner: Option<User>,
    /// Live songs in playlist order; dangling references skipped
    pub songs: Vec<Song>,
}

/// Aggregate catalog figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_users: usize,
    pub total_songs: usize,
    pub total_playlists: usize,
    pub avg_songs_per_playlist: f64,
    pub users_with_playlists: usize,
    pub avg_playlists_per_user: f64,
}

/// Average that yields 0.0 for an empty denominator
pub(crate) fn ratio(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Validate a name-like field
pub fn validate_name(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::validation(
            field,
            format!("must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    Ok(())
}

/// Validate a strictly positive integer field and narrow it to `u32`
pub fn validate_positive(field: &str, value: i64) -> CatalogResult<u32> {
    if value <= 0 {
        return Err(CatalogError::validation(field, "must be greater than zero"));
    }
    u32::try_from(value).map_err(|_| CatalogError::validation(field, "is out of range"))
}

/// Validate a referenced id (owner or song) before it is looked up
pub fn validate_reference(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Ana").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN)).is_ok());

        let err = validate_name("artist", &"x".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(err.field(), Some("artist"));
    }

    #[test]
    fn test_validate_positive() {
        assert_eq!(validate_positive("age", 30).unwrap(), 30);
        assert!(validate_positive("age", 0).is_err());
        assert!(validate_positive("age", -4).is_err());
        assert!(validate_positive("duration_seconds", i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(12, 3), 4.0);
    }
}

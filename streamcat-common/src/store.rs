//! In-memory catalog Store
//!
//! The Store is the only owner of entity state and the single choke point for mutations. One
//! coarse `RwLock` guards the entity tables together with the reverse indexes, so a mutation and
//! its index update become visible to readers at the same instant: any read issued after a write
//! returns observes it, whichever adapter issued either call.
//!
//! State is process-scoped. It starts from the seed snapshot, diverges with every mutation and is
//! discarded on shutdown; nothing is ever written back to the seed files.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult, Entity};
use crate::index::Indexes;
use crate::model::{
    validate_name, validate_positive, validate_reference, NewPlaylist, NewSong, NewUser, Playlist,
    PlaylistPatch, Song, SongPatch, User, UserPatch,
};
use crate::ops::{PlaylistOps, SongOps, UserOps};
use crate::seed::SeedData;
use crate::table::Table;

/// Write-time handling of playlist `song_ids`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongRefPolicy {
    /// Accept any song id; readers skip dangling references
    #[default]
    Tolerate,
    /// Reject unknown song ids with `ReferentialError`
    Validate,
}

/// Entity tables plus the indexes derived from them
#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub users: Table<User>,
    pub songs: Table<Song>,
    pub playlists: Table<Playlist>,
    pub indexes: Indexes,
}

/// Thread-safe catalog Store
#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<CatalogState>,
    song_refs: SongRefPolicy,
}

impl Store {
    /// Create an empty Store
    pub fn new(song_refs: SongRefPolicy) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            song_refs,
        }
    }

    /// Create a Store holding the seed snapshot
    ///
    /// Seed records pass the same field validation as `create_*`. Duplicate ids and playlists
    /// whose owner is not in the seed are rejected; dangling seed song ids are kept.
    pub fn from_seed(seed: SeedData, song_refs: SongRefPolicy) -> CatalogResult<Self> {
        let mut state = CatalogState::default();

        for record in seed.users {
            validate_reference("id", &record.id)?;
            validate_name("name", &record.name)?;
            let age = validate_positive("age", record.age)?;
            let user = User {
                id: record.id.clone(),
                name: record.name,
                age,
            };
            if state.users.insert(record.id.clone(), user).is_none() {
                return Err(duplicate_id(Entity::User, &record.id));
            }
        }

        for record in seed.songs {
            validate_reference("id", &record.id)?;
            validate_name("name", &record.name)?;
            validate_name("artist", &record.artist)?;
            let duration_seconds = validate_positive("duration_seconds", record.duration_seconds)?;
            let song = Song {
                id: record.id.clone(),
                name: record.name,
                artist: record.artist,
                duration_seconds,
            };
            if state.songs.insert(record.id.clone(), song).is_none() {
                return Err(duplicate_id(Entity::Song, &record.id));
            }
        }

        for record in seed.playlists {
            validate_reference("id", &record.id)?;
            validate_name("name", &record.name)?;
            if !state.users.contains(&record.owner_id) {
                return Err(CatalogError::referential("owner_id", record.owner_id));
            }
            let playlist = Playlist {
                id: record.id.clone(),
                name: record.name,
                owner_id: record.owner_id,
                song_ids: record.song_ids,
            };
            if state.playlists.insert(record.id.clone(), playlist).is_none() {
                return Err(duplicate_id(Entity::Playlist, &record.id));
            }
        }

        state.indexes = Indexes::rebuild(&state.users, &state.songs, &state.playlists);

        info!(
            "Seed loaded: {} users, {} songs, {} playlists",
            state.users.len(),
            state.songs.len(),
            state.playlists.len()
        );

        Ok(Self {
            state: RwLock::new(state),
            song_refs,
        })
    }

    pub fn song_ref_policy(&self) -> SongRefPolicy {
        self.song_refs
    }

    pub(crate) fn read(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.state.read().map_err(|_| poisoned())
    }

    pub(crate) fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state.write().map_err(|_| poisoned())
    }

    /// Compare the maintained indexes with a from-scratch rebuild
    pub fn verify_indexes(&self) -> CatalogResult<()> {
        let state = self.read()?;
        let rebuilt = Indexes::rebuild(&state.users, &state.songs, &state.playlists);
        if rebuilt != state.indexes {
            error!("Index drift detected: maintained indexes differ from store contents");
            return Err(CatalogError::Internal(
                "indexes diverged from store contents".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace the maintained indexes with a from-scratch rebuild
    pub fn rebuild_indexes(&self) -> CatalogResult<()> {
        let mut state = self.write()?;
        state.indexes = Indexes::rebuild(&state.users, &state.songs, &state.playlists);
        info!("Indexes rebuilt");
        Ok(())
    }

    /// Reject song ids the catalog does not know, when the policy asks for it
    fn check_song_refs(&self, songs: &Table<Song>, song_ids: &[String]) -> CatalogResult<()> {
        if self.song_refs == SongRefPolicy::Validate {
            if let Some(missing) = song_ids.iter().find(|id| !songs.contains(id)) {
                return Err(CatalogError::referential("song_ids", missing.clone()));
            }
        }
        Ok(())
    }
}

fn poisoned() -> CatalogError {
    error!("Catalog lock poisoned by a panicking writer");
    CatalogError::Internal("catalog lock poisoned".to_string())
}

fn duplicate_id(entity: Entity, id: &str) -> CatalogError {
    CatalogError::validation("id", format!("duplicate {} id {}", entity, id))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_song_ids(song_ids: &[String]) -> CatalogResult<()> {
    song_ids
        .iter()
        .try_for_each(|id| validate_reference("song_ids", id))
}

// ============================================================================
// Users
// ============================================================================

impl UserOps for Store {
    fn get_user(&self, id: &str) -> CatalogResult<User> {
        self.read()?
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(Entity::User, id))
    }

    fn list_users(&self) -> CatalogResult<Vec<User>> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    fn create_user(&self, input: NewUser) -> CatalogResult<User> {
        validate_name("name", &input.name)?;
        let age = validate_positive("age", input.age)?;

        let user = User {
            id: new_id(),
            name: input.name,
            age,
        };

        let mut state = self.write()?;
        if state.users.insert(user.id.clone(), user.clone()).is_none() {
            return Err(CatalogError::Internal(format!("user id collision: {}", user.id)));
        }
        debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    fn update_user(&self, id: &str, patch: UserPatch) -> CatalogResult<User> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        let age = patch
            .age
            .map(|age| validate_positive("age", age))
            .transpose()?;

        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| CatalogError::not_found(Entity::User, id))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(age) = age {
            user.age = age;
        }
        debug!(user_id = %id, "Updated user");
        Ok(user.clone())
    }

    fn delete_user(&self, id: &str) -> CatalogResult<bool> {
        let mut state = self.write()?;
        if state.users.remove(id).is_none() {
            return Ok(false);
        }
        state.indexes.drop_owner(id);
        debug!(user_id = %id, "Deleted user");
        Ok(true)
    }
}

// ============================================================================
// Songs
// ============================================================================

impl SongOps for Store {
    fn get_song(&self, id: &str) -> CatalogResult<Song> {
        self.read()?
            .songs
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(Entity::Song, id))
    }

    fn list_songs(&self) -> CatalogResult<Vec<Song>> {
        Ok(self.read()?.songs.values().cloned().collect())
    }

    fn create_song(&self, input: NewSong) -> CatalogResult<Song> {
        validate_name("name", &input.name)?;
        validate_name("artist", &input.artist)?;
        let duration_seconds = validate_positive("duration_seconds", input.duration_seconds)?;

        let song = Song {
            id: new_id(),
            name: input.name,
            artist: input.artist,
            duration_seconds,
        };

        let mut state = self.write()?;
        if state.songs.insert(song.id.clone(), song.clone()).is_none() {
            return Err(CatalogError::Internal(format!("song id collision: {}", song.id)));
        }
        debug!(song_id = %song.id, "Created song");
        Ok(song)
    }

    fn update_song(&self, id: &str, patch: SongPatch) -> CatalogResult<Song> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(artist) = &patch.artist {
            validate_name("artist", artist)?;
        }
        let duration_seconds = patch
            .duration_seconds
            .map(|d| validate_positive("duration_seconds", d))
            .transpose()?;

        let mut state = self.write()?;
        let song = state
            .songs
            .get_mut(id)
            .ok_or_else(|| CatalogError::not_found(Entity::Song, id))?;
        if let Some(name) = patch.name {
            song.name = name;
        }
        if let Some(artist) = patch.artist {
            song.artist = artist;
        }
        if let Some(duration_seconds) = duration_seconds {
            song.duration_seconds = duration_seconds;
        }
        debug!(song_id = %id, "Updated song");
        Ok(song.clone())
    }

    fn delete_song(&self, id: &str) -> CatalogResult<bool> {
        let mut state = self.write()?;
        if state.songs.remove(id).is_none() {
            return Ok(false);
        }
        state.indexes.drop_song(id);
        debug!(song_id = %id, "Deleted song");
        Ok(true)
    }
}

// ============================================================================
// Playlists
// ============================================================================

impl PlaylistOps for Store {
    fn get_playlist(&self, id: &str) -> CatalogResult<Playlist> {
        self.read()?
            .playlists
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(Entity::Playlist, id))
    }

    fn list_playlists(&self) -> CatalogResult<Vec<Playlist>> {
        Ok(self.read()?.playlists.values().cloned().collect())
    }

    fn create_playlist(&self, input: NewPlaylist) -> CatalogResult<Playlist> {
        validate_name("name", &input.name)?;
        validate_reference("owner_id", &input.owner_id)?;
        validate_song_ids(&input.song_ids)?;

        let playlist = Playlist {
            id: new_id(),
            name: input.name,
            owner_id: input.owner_id,
            song_ids: input.song_ids,
        };

        let mut guard = self.write()?;
        let CatalogState {
            users,
            songs,
            playlists,
            indexes,
        } = &mut *guard;

        if !users.contains(&playlist.owner_id) {
            return Err(CatalogError::referential("owner_id", playlist.owner_id));
        }
        self.check_song_refs(songs, &playlist.song_ids)?;

        let seq = playlists
            .insert(playlist.id.clone(), playlist.clone())
            .ok_or_else(|| {
                CatalogError::Internal(format!("playlist id collision: {}", playlist.id))
            })?;
        indexes.link_playlist(seq, &playlist, users, songs);

        debug!(playlist_id = %playlist.id, owner_id = %playlist.owner_id, "Created playlist");
        Ok(playlist)
    }

    fn update_playlist(&self, id: &str, patch: PlaylistPatch) -> CatalogResult<Playlist> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(owner_id) = &patch.owner_id {
            validate_reference("owner_id", owner_id)?;
        }
        if let Some(song_ids) = &patch.song_ids {
            validate_song_ids(song_ids)?;
        }

        let mut guard = self.write()?;
        let CatalogState {
            users,
            songs,
            playlists,
            indexes,
        } = &mut *guard;

        let seq = playlists
            .seq_of(id)
            .ok_or_else(|| CatalogError::not_found(Entity::Playlist, id))?;
        if let Some(owner_id) = &patch.owner_id {
            if !users.contains(owner_id) {
                return Err(CatalogError::referential("owner_id", owner_id.clone()));
            }
        }
        if let Some(song_ids) = &patch.song_ids {
            self.check_song_refs(songs, song_ids)?;
        }

        let playlist = playlists
            .get_mut(id)
            .ok_or_else(|| CatalogError::Internal(format!("playlist {} lost its row", id)))?;
        indexes.unlink_playlist(seq, playlist);
        if let Some(name) = patch.name {
            playlist.name = name;
        }
        if let Some(owner_id) = patch.owner_id {
            playlist.owner_id = owner_id;
        }
        if let Some(song_ids) = patch.song_ids {
            playlist.song_ids = song_ids;
        }
        indexes.link_playlist(seq, playlist, users, songs);

        debug!(playlist_id = %id, "Updated playlist");
        Ok(playlist.clone())
    }

    fn delete_playlist(&self, id: &str) -> CatalogResult<bool> {
        let mut state = self.write()?;
        let Some((seq, playlist)) = state.playlists.remove(id) else {
            return Ok(false);
        };
        state.indexes.unlink_playlist(seq, &playlist);
        debug!(playlist_id = %id, "Deleted playlist");
        Ok(true)
    }
}

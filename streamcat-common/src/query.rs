//! Query Engine: derived views served from the maintained indexes
//!
//! Every view costs O(k) in the size of its result. Reads share the Store lock, so a view never
//! mixes state from before and after a concurrent mutation.

use std::collections::BTreeSet;

use tracing::{error, warn};

use crate::error::{CatalogError, CatalogResult, Entity};
use crate::index::Indexes;
use crate::model::{ratio, Playlist, PlaylistDetails, Song, Statistics};
use crate::ops::QueryOps;
use crate::store::{CatalogState, Store};

impl CatalogState {
    /// Resolve indexed playlist sequence numbers; `None` means the index drifted
    fn resolve_playlists(&self, seqs: Option<&BTreeSet<u64>>) -> Option<Vec<Playlist>> {
        let Some(seqs) = seqs else {
            return Some(Vec::new());
        };
        seqs.iter()
            .map(|seq| {
                let found = self.playlists.by_seq(*seq).cloned();
                if found.is_none() {
                    error!(seq, "Index references a playlist that is no longer stored");
                }
                found
            })
            .collect()
    }

    fn live_songs(&self, playlist: &Playlist) -> Vec<Song> {
        playlist
            .song_ids
            .iter()
            .filter_map(|id| self.songs.get(id).cloned())
            .collect()
    }
}

impl Store {
    /// Playlists found through one index entry. A stale entry triggers a full rebuild and one
    /// retry; drift that survives the rebuild is an `InternalError`.
    fn indexed_playlists<F>(&self, lookup: F) -> CatalogResult<Vec<Playlist>>
    where
        F: Fn(&Indexes) -> Option<&BTreeSet<u64>>,
    {
        {
            let state = self.read()?;
            if let Some(found) = state.resolve_playlists(lookup(&state.indexes)) {
                return Ok(found);
            }
        }

        warn!("Rebuilding indexes after drift was detected during a query");
        self.rebuild_indexes()?;

        let state = self.read()?;
        state
            .resolve_playlists(lookup(&state.indexes))
            .ok_or_else(|| CatalogError::Internal("index drift persists after rebuild".to_string()))
    }
}

impl QueryOps for Store {
    fn playlists_of_user(&self, user_id: &str) -> CatalogResult<Vec<Playlist>> {
        self.indexed_playlists(|indexes| indexes.playlists_by_owner.get(user_id))
    }

    fn songs_of_playlist(&self, playlist_id: &str) -> CatalogResult<Vec<Song>> {
        let state = self.read()?;
        let playlist = state
            .playlists
            .get(playlist_id)
            .ok_or_else(|| CatalogError::not_found(Entity::Playlist, playlist_id))?;
        Ok(state.live_songs(playlist))
    }

    fn playlists_containing_song(&self, song_id: &str) -> CatalogResult<Vec<Playlist>> {
        self.indexed_playlists(|indexes| indexes.playlists_by_song.get(song_id))
    }

    fn playlist_details(&self, playlist_id: &str) -> CatalogResult<PlaylistDetails> {
        let state = self.read()?;
        let playlist = state
            .playlists
            .get(playlist_id)
            .ok_or_else(|| CatalogError::not_found(Entity::Playlist, playlist_id))?;
        Ok(PlaylistDetails {
            owner: state.users.get(&playlist.owner_id).cloned(),
            songs: state.live_songs(playlist),
            playlist: playlist.clone(),
        })
    }

    fn statistics(&self) -> CatalogResult<Statistics> {
        let state = self.read()?;
        let indexes = &state.indexes;
        let total_playlists = state.playlists.len();
        let users_with_playlists = indexes.users_with_playlists();
        Ok(Statistics {
            total_users: state.users.len(),
            total_songs: state.songs.len(),
            total_playlists,
            avg_songs_per_playlist: ratio(indexes.song_slots, total_playlists),
            users_with_playlists,
            avg_playlists_per_user: ratio(indexes.owned_playlists, users_with_playlists),
        })
    }
}

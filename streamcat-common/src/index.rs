//! Reverse indexes maintained alongside every Store mutation
//!
//! Playlists are referenced by their table sequence number, so index lookups come back in
//! playlist insertion order without sorting.
//!
//! Invariants (checked by [`Indexes::rebuild`] comparison):
//! - `playlists_by_owner` holds live owners only, each with a non-empty set
//! - `playlists_by_song` holds live songs only, each with a non-empty set
//! - `owned_playlists` equals the sum of `playlists_by_owner` set sizes
//! - `song_slots` equals the sum of `song_ids.len()` over all playlists, dangling entries included

use std::collections::{BTreeSet, HashMap};

use crate::model::{Playlist, Song, User};
use crate::table::Table;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Indexes {
    pub playlists_by_owner: HashMap<String, BTreeSet<u64>>,
    pub playlists_by_song: HashMap<String, BTreeSet<u64>>,
    pub owned_playlists: usize,
    pub song_slots: usize,
}

impl Indexes {
    /// Build every index from scratch. Recovery path and reference for drift checks.
    pub fn rebuild(users: &Table<User>, songs: &Table<Song>, playlists: &Table<Playlist>) -> Self {
        let mut indexes = Indexes::default();
        for (seq, playlist) in playlists.entries() {
            indexes.link_playlist(seq, playlist, users, songs);
        }
        indexes
    }

    /// Register a playlist that was just inserted (or re-registered after an update)
    pub fn link_playlist(
        &mut self,
        seq: u64,
        playlist: &Playlist,
        users: &Table<User>,
        songs: &Table<Song>,
    ) {
        if users.contains(&playlist.owner_id)
            && self
                .playlists_by_owner
                .entry(playlist.owner_id.clone())
                .or_default()
                .insert(seq)
        {
            self.owned_playlists += 1;
        }

        for song_id in &playlist.song_ids {
            if songs.contains(song_id) {
                self.playlists_by_song
                    .entry(song_id.clone())
                    .or_default()
                    .insert(seq);
            }
        }

        self.song_slots += playlist.song_ids.len();
    }

    /// Forget a playlist that is about to be removed or rewritten
    pub fn unlink_playlist(&mut self, seq: u64, playlist: &Playlist) {
        if remove_member(&mut self.playlists_by_owner, &playlist.owner_id, seq) {
            self.owned_playlists -= 1;
        }

        for song_id in &playlist.song_ids {
            remove_member(&mut self.playlists_by_song, song_id, seq);
        }

        self.song_slots -= playlist.song_ids.len();
    }

    /// Owner deleted: its playlists stay, but are no longer reachable through the owner
    pub fn drop_owner(&mut self, user_id: &str) {
        if let Some(set) = self.playlists_by_owner.remove(user_id) {
            self.owned_playlists -= set.len();
        }
    }

    /// Song deleted: playlists keep the dangling id
    pub fn drop_song(&mut self, song_id: &str) {
        self.playlists_by_song.remove(song_id);
    }

    pub fn users_with_playlists(&self) -> usize {
        self.playlists_by_owner.len()
    }
}

/// Remove `seq` from the set stored under `key`, dropping the entry once empty
fn remove_member(map: &mut HashMap<String, BTreeSet<u64>>, key: &str, seq: u64) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(&seq);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}

//! GraphQL output types
//!
//! Thin wrappers over the catalog entities. Field names are exposed in camelCase; relationship
//! fields (`User.playlists`, `Playlist.owner`, `Playlist.songs`, `Song.playlists`) resolve through
//! the same catalog the root fields use.

use async_graphql::{Context, Object, Result, SimpleObject, ID};
use streamcat_common::{
    CatalogError, Playlist, PlaylistDetails, QueryOps, Song, Statistics, User, UserOps,
};

use super::{catalog, gql_error};

pub struct UserNode(pub User);

#[Object(name = "User")]
impl UserNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn age(&self) -> u32 {
        self.0.age
    }

    /// Playlists this user owns
    async fn playlists(&self, ctx: &Context<'_>) -> Result<Vec<PlaylistNode>> {
        let playlists = catalog(ctx)?
            .playlists_of_user(&self.0.id)
            .map_err(gql_error)?;
        Ok(playlists.into_iter().map(PlaylistNode).collect())
    }
}

pub struct SongNode(pub Song);

#[Object(name = "Song")]
impl SongNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn artist(&self) -> &str {
        &self.0.artist
    }

    async fn duration_seconds(&self) -> u32 {
        self.0.duration_seconds
    }

    /// Playlists that include this song
    async fn playlists(&self, ctx: &Context<'_>) -> Result<Vec<PlaylistNode>> {
        let playlists = catalog(ctx)?
            .playlists_containing_song(&self.0.id)
            .map_err(gql_error)?;
        Ok(playlists.into_iter().map(PlaylistNode).collect())
    }
}

pub struct PlaylistNode(pub Playlist);

#[Object(name = "Playlist")]
impl PlaylistNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn owner_id(&self) -> ID {
        ID(self.0.owner_id.clone())
    }

    /// Raw song references, including ones that no longer resolve
    async fn song_ids(&self) -> Vec<ID> {
        self.0.song_ids.iter().cloned().map(ID).collect()
    }

    /// `null` once the owner has been deleted
    async fn owner(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        match catalog(ctx)?.get_user(&self.0.owner_id) {
            Ok(user) => Ok(Some(UserNode(user))),
            Err(CatalogError::NotFound { .. }) => Ok(None),
            Err(err) => Err(gql_error(err)),
        }
    }

    async fn songs(&self, ctx: &Context<'_>) -> Result<Vec<SongNode>> {
        let songs = catalog(ctx)?
            .songs_of_playlist(&self.0.id)
            .map_err(gql_error)?;
        Ok(songs.into_iter().map(SongNode).collect())
    }
}

pub struct PlaylistDetailsNode(pub PlaylistDetails);

#[Object(name = "PlaylistDetails")]
impl PlaylistDetailsNode {
    async fn playlist(&self) -> PlaylistNode {
        PlaylistNode(self.0.playlist.clone())
    }

    async fn owner(&self) -> Option<UserNode> {
        self.0.owner.clone().map(UserNode)
    }

    async fn songs(&self) -> Vec<SongNode> {
        self.0.songs.iter().cloned().map(SongNode).collect()
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Statistics")]
pub struct StatisticsNode {
    pub total_users: usize,
    pub total_songs: usize,
    pub total_playlists: usize,
    pub avg_songs_per_playlist: f64,
    pub users_with_playlists: usize,
    pub avg_playlists_per_user: f64,
}

impl From<Statistics> for StatisticsNode {
    fn from(stats: Statistics) -> Self {
        Self {
            total_users: stats.total_users,
            total_songs: stats.total_songs,
            total_playlists: stats.total_playlists,
            avg_songs_per_playlist: stats.avg_songs_per_playlist,
            users_with_playlists: stats.users_with_playlists,
            avg_playlists_per_user: stats.avg_playlists_per_user,
        }
    }
}

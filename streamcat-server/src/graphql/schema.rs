//! Query and mutation roots

use async_graphql::{Context, Object, Result, ID};
use streamcat_common::{
    NewPlaylist, NewSong, NewUser, PlaylistOps, PlaylistPatch, QueryOps, SongOps, SongPatch,
    UserOps, UserPatch,
};

use super::types::{PlaylistDetailsNode, PlaylistNode, SongNode, StatisticsNode, UserNode};
use super::{catalog, gql_error};

fn ids(list: Vec<ID>) -> Vec<String> {
    list.into_iter().map(|id| id.0).collect()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let users = catalog(ctx)?.list_users().map_err(gql_error)?;
        Ok(users.into_iter().map(UserNode).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<UserNode> {
        Ok(UserNode(catalog(ctx)?.get_user(&id).map_err(gql_error)?))
    }

    async fn songs(&self, ctx: &Context<'_>) -> Result<Vec<SongNode>> {
        let songs = catalog(ctx)?.list_songs().map_err(gql_error)?;
        Ok(songs.into_iter().map(SongNode).collect())
    }

    async fn song(&self, ctx: &Context<'_>, id: ID) -> Result<SongNode> {
        Ok(SongNode(catalog(ctx)?.get_song(&id).map_err(gql_error)?))
    }

    async fn playlists(&self, ctx: &Context<'_>) -> Result<Vec<PlaylistNode>> {
        let playlists = catalog(ctx)?.list_playlists().map_err(gql_error)?;
        Ok(playlists.into_iter().map(PlaylistNode).collect())
    }

    async fn playlist(&self, ctx: &Context<'_>, id: ID) -> Result<PlaylistNode> {
        Ok(PlaylistNode(
            catalog(ctx)?.get_playlist(&id).map_err(gql_error)?,
        ))
    }

    async fn playlists_of_user(&self, ctx: &Context<'_>, user_id: ID) -> Result<Vec<PlaylistNode>> {
        let playlists = catalog(ctx)?
            .playlists_of_user(&user_id)
            .map_err(gql_error)?;
        Ok(playlists.into_iter().map(PlaylistNode).collect())
    }

    async fn songs_of_playlist(&self, ctx: &Context<'_>, playlist_id: ID) -> Result<Vec<SongNode>> {
        let songs = catalog(ctx)?
            .songs_of_playlist(&playlist_id)
            .map_err(gql_error)?;
        Ok(songs.into_iter().map(SongNode).collect())
    }

    async fn playlists_containing_song(
        &self,
        ctx: &Context<'_>,
        song_id: ID,
    ) -> Result<Vec<PlaylistNode>> {
        let playlists = catalog(ctx)?
            .playlists_containing_song(&song_id)
            .map_err(gql_error)?;
        Ok(playlists.into_iter().map(PlaylistNode).collect())
    }

    async fn playlist_details(&self, ctx: &Context<'_>, id: ID) -> Result<PlaylistDetailsNode> {
        Ok(PlaylistDetailsNode(
            catalog(ctx)?.playlist_details(&id).map_err(gql_error)?,
        ))
    }

    async fn statistics(&self, ctx: &Context<'_>) -> Result<StatisticsNode> {
        Ok(catalog(ctx)?.statistics().map_err(gql_error)?.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, name: String, age: i64) -> Result<UserNode> {
        let user = catalog(ctx)?
            .create_user(NewUser { name, age })
            .map_err(gql_error)?;
        Ok(UserNode(user))
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        age: Option<i64>,
    ) -> Result<UserNode> {
        let user = catalog(ctx)?
            .update_user(&id, UserPatch { name, age })
            .map_err(gql_error)?;
        Ok(UserNode(user))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        catalog(ctx)?.delete_user(&id).map_err(gql_error)
    }

    async fn create_song(
        &self,
        ctx: &Context<'_>,
        name: String,
        artist: String,
        duration_seconds: i64,
    ) -> Result<SongNode> {
        let song = catalog(ctx)?
            .create_song(NewSong {
                name,
                artist,
                duration_seconds,
            })
            .map_err(gql_error)?;
        Ok(SongNode(song))
    }

    async fn update_song(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        artist: Option<String>,
        duration_seconds: Option<i64>,
    ) -> Result<SongNode> {
        let patch = SongPatch {
            name,
            artist,
            duration_seconds,
        };
        let song = catalog(ctx)?.update_song(&id, patch).map_err(gql_error)?;
        Ok(SongNode(song))
    }

    async fn delete_song(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        catalog(ctx)?.delete_song(&id).map_err(gql_error)
    }

    async fn create_playlist(
        &self,
        ctx: &Context<'_>,
        name: String,
        owner_id: ID,
        #[graphql(default)] song_ids: Vec<ID>,
    ) -> Result<PlaylistNode> {
        let input = NewPlaylist {
            name,
            owner_id: owner_id.0,
            song_ids: ids(song_ids),
        };
        let playlist = catalog(ctx)?.create_playlist(input).map_err(gql_error)?;
        Ok(PlaylistNode(playlist))
    }

    async fn update_playlist(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        owner_id: Option<ID>,
        song_ids: Option<Vec<ID>>,
    ) -> Result<PlaylistNode> {
        let patch = PlaylistPatch {
            name,
            owner_id: owner_id.map(|id| id.0),
            song_ids: song_ids.map(ids),
        };
        let playlist = catalog(ctx)?
            .update_playlist(&id, patch)
            .map_err(gql_error)?;
        Ok(PlaylistNode(playlist))
    }

    async fn delete_playlist(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        catalog(ctx)?.delete_playlist(&id).map_err(gql_error)
    }
}

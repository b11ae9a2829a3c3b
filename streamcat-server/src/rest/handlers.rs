//! HTTP request handlers for the REST adapter
//!
//! Bodies use the canonical snake_case field names. `PUT` replaces every field, `PATCH` only the
//! supplied ones.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use streamcat_common::{
    CatalogError, NewPlaylist, NewSong, NewUser, Playlist, PlaylistDetails, PlaylistOps,
    PlaylistPatch, QueryOps, Song, SongOps, SongPatch, Statistics, User, UserOps, UserPatch,
};

use super::error::ApiResult;
use crate::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// `PUT /playlists/:id` body; unlike create, `song_ids` must be present
#[derive(Debug, Deserialize)]
pub struct ReplacePlaylist {
    pub name: String,
    pub owner_id: String,
    pub song_ids: Option<Vec<String>>,
}

impl ReplacePlaylist {
    fn into_patch(self) -> Result<PlaylistPatch, CatalogError> {
        let song_ids = self
            .song_ids
            .ok_or_else(|| CatalogError::validation("song_ids", "is required"))?;
        Ok(PlaylistPatch {
            name: Some(self.name),
            owner_id: Some(self.owner_id),
            song_ids: Some(song_ids),
        })
    }
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.catalog.list_users()?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.catalog.get_user(&id)?))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Body<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(input) = body?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_user(input)?)))
}

pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<NewUser>,
) -> ApiResult<Json<User>> {
    let Json(input) = body?;
    Ok(Json(state.catalog.update_user(&id, input.into())?))
}

pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<UserPatch>,
) -> ApiResult<Json<User>> {
    let Json(patch) = body?;
    Ok(Json(state.catalog.update_user(&id, patch)?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_user(&id)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn playlists_of_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Playlist>>> {
    Ok(Json(state.catalog.playlists_of_user(&id)?))
}

// ============================================================================
// Songs
// ============================================================================

pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    Ok(Json(state.catalog.list_songs()?))
}

pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Song>> {
    Ok(Json(state.catalog.get_song(&id)?))
}

pub async fn create_song(
    State(state): State<AppState>,
    body: Body<NewSong>,
) -> ApiResult<(StatusCode, Json<Song>)> {
    let Json(input) = body?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_song(input)?)))
}

pub async fn replace_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<NewSong>,
) -> ApiResult<Json<Song>> {
    let Json(input) = body?;
    Ok(Json(state.catalog.update_song(&id, input.into())?))
}

pub async fn patch_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<SongPatch>,
) -> ApiResult<Json<Song>> {
    let Json(patch) = body?;
    Ok(Json(state.catalog.update_song(&id, patch)?))
}

pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_song(&id)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn playlists_containing_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Playlist>>> {
    Ok(Json(state.catalog.playlists_containing_song(&id)?))
}

// ============================================================================
// Playlists
// ============================================================================

pub async fn list_playlists(State(state): State<AppState>) -> ApiResult<Json<Vec<Playlist>>> {
    Ok(Json(state.catalog.list_playlists()?))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(state.catalog.get_playlist(&id)?))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    body: Body<NewPlaylist>,
) -> ApiResult<(StatusCode, Json<Playlist>)> {
    let Json(input) = body?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_playlist(input)?)))
}

pub async fn replace_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<ReplacePlaylist>,
) -> ApiResult<Json<Playlist>> {
    let Json(input) = body?;
    Ok(Json(state.catalog.update_playlist(&id, input.into_patch()?)?))
}

pub async fn patch_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body<PlaylistPatch>,
) -> ApiResult<Json<Playlist>> {
    let Json(patch) = body?;
    Ok(Json(state.catalog.update_playlist(&id, patch)?))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.catalog.delete_playlist(&id)?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn songs_of_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Song>>> {
    Ok(Json(state.catalog.songs_of_playlist(&id)?))
}

pub async fn playlist_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PlaylistDetails>> {
    Ok(Json(state.catalog.playlist_details(&id)?))
}

// ============================================================================
// Aggregates
// ============================================================================

pub async fn statistics(State(state): State<AppState>) -> ApiResult<Json<Statistics>> {
    Ok(Json(state.catalog.statistics()?))
}

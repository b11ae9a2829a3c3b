//! REST adapter (JSON over HTTP)

use axum::{routing::get, Router};

use crate::{api, AppState};

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult};

/// Listener name reported by `/health`
pub const MODULE: &str = "streamcat-rest";

/// Build the REST router
pub fn build_router(state: AppState) -> Router {
    use handlers::*;

    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user)
                .put(replace_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .route("/users/:id/playlists", get(playlists_of_user))
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/songs/:id",
            get(get_song)
                .put(replace_song)
                .patch(patch_song)
                .delete(delete_song),
        )
        .route("/songs/:id/playlists", get(playlists_containing_song))
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/playlists/:id",
            get(get_playlist)
                .put(replace_playlist)
                .patch(patch_playlist)
                .delete(delete_playlist),
        )
        .route("/playlists/:id/songs", get(songs_of_playlist))
        .route("/playlists/:id/details", get(playlist_details))
        .route("/stats", get(statistics))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes(MODULE))
        .with_state(state)
}

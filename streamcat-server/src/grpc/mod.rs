//! gRPC adapter (`streamcat.CatalogService`)
//!
//! Unary RPCs mirror the catalog operations one to one. `StreamSongs` answers each inbound
//! `SongRequest` with the song, and skips ids that do not resolve.

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use streamcat_common::{
    Catalog, CatalogError, ErrorKind, PlaylistOps, QueryOps, SongOps, UserOps,
};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, error};

use crate::AppState;

pub mod proto;

pub use proto::catalog_service_client::CatalogServiceClient;
pub use proto::catalog_service_server::{CatalogService, CatalogServiceServer};

/// Map a catalog failure onto the closest gRPC status
pub fn to_status(err: CatalogError) -> Status {
    match err.kind() {
        ErrorKind::Validation => Status::invalid_argument(err.to_string()),
        ErrorKind::NotFound => Status::not_found(err.to_string()),
        ErrorKind::Referential => Status::failed_precondition(err.to_string()),
        ErrorKind::Internal => {
            error!("gRPC request failed: {}", err);
            Status::internal(err.to_string())
        }
    }
}

type GrpcResult<T> = Result<Response<T>, Status>;

fn reply<T, U: From<T>>(result: Result<T, CatalogError>) -> GrpcResult<U> {
    result.map(|value| Response::new(value.into())).map_err(to_status)
}

fn deleted(result: Result<bool, CatalogError>) -> GrpcResult<proto::DeleteResponse> {
    reply(result.map(|deleted| proto::DeleteResponse { deleted }))
}

/// Service implementation over the shared catalog
#[derive(Clone)]
pub struct CatalogGrpc {
    catalog: Arc<dyn Catalog>,
}

impl CatalogGrpc {
    pub fn new(state: AppState) -> Self {
        Self {
            catalog: state.catalog,
        }
    }

    /// Wrap in the generated tonic server
    pub fn into_server(self) -> CatalogServiceServer<Self> {
        CatalogServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl CatalogService for CatalogGrpc {
    async fn get_user(&self, request: Request<proto::IdRequest>) -> GrpcResult<proto::User> {
        reply(self.catalog.get_user(&request.into_inner().id))
    }

    async fn list_users(&self, _request: Request<proto::Empty>) -> GrpcResult<proto::UserList> {
        reply(self.catalog.list_users().map(|users| proto::UserList {
            users: users.into_iter().map(proto::User::from).collect(),
        }))
    }

    async fn create_user(
        &self,
        request: Request<proto::CreateUserRequest>,
    ) -> GrpcResult<proto::User> {
        reply(self.catalog.create_user(request.into_inner().into()))
    }

    async fn update_user(
        &self,
        request: Request<proto::UpdateUserRequest>,
    ) -> GrpcResult<proto::User> {
        let (id, patch) = request.into_inner().into_parts();
        reply(self.catalog.update_user(&id, patch))
    }

    async fn delete_user(
        &self,
        request: Request<proto::IdRequest>,
    ) -> GrpcResult<proto::DeleteResponse> {
        deleted(self.catalog.delete_user(&request.into_inner().id))
    }

    async fn get_song(&self, request: Request<proto::IdRequest>) -> GrpcResult<proto::Song> {
        reply(self.catalog.get_song(&request.into_inner().id))
    }

    async fn list_songs(&self, _request: Request<proto::Empty>) -> GrpcResult<proto::SongList> {
        reply(self.catalog.list_songs().map(|songs| proto::SongList {
            songs: songs.into_iter().map(proto::Song::from).collect(),
        }))
    }

    async fn create_song(
        &self,
        request: Request<proto::CreateSongRequest>,
    ) -> GrpcResult<proto::Song> {
        reply(self.catalog.create_song(request.into_inner().into()))
    }

    async fn update_song(
        &self,
        request: Request<proto::UpdateSongRequest>,
    ) -> GrpcResult<proto::Song> {
        let (id, patch) = request.into_inner().into_parts();
        reply(self.catalog.update_song(&id, patch))
    }

    async fn delete_song(
        &self,
        request: Request<proto::IdRequest>,
    ) -> GrpcResult<proto::DeleteResponse> {
        deleted(self.catalog.delete_song(&request.into_inner().id))
    }

    async fn get_playlist(
        &self,
        request: Request<proto::IdRequest>,
    ) -> GrpcResult<proto::Playlist> {
        reply(self.catalog.get_playlist(&request.into_inner().id))
    }

    async fn list_playlists(
        &self,
        _request: Request<proto::Empty>,
    ) -> GrpcResult<proto::PlaylistList> {
        reply(self.catalog.list_playlists().map(playlist_list))
    }

    async fn create_playlist(
        &self,
        request: Request<proto::CreatePlaylistRequest>,
    ) -> GrpcResult<proto::Playlist> {
        reply(self.catalog.create_playlist(request.into_inner().into()))
    }

    async fn update_playlist(
        &self,
        request: Request<proto::UpdatePlaylistRequest>,
    ) -> GrpcResult<proto::Playlist> {
        let (id, patch) = request.into_inner().into_parts();
        reply(self.catalog.update_playlist(&id, patch))
    }

    async fn delete_playlist(
        &self,
        request: Request<proto::IdRequest>,
    ) -> GrpcResult<proto::DeleteResponse> {
        deleted(self.catalog.delete_playlist(&request.into_inner().id))
    }

    async fn playlists_of_user(
        &self,
        request: Request<proto::UserRequest>,
    ) -> GrpcResult<proto::PlaylistList> {
        let user_id = request.into_inner().user_id;
        reply(self.catalog.playlists_of_user(&user_id).map(playlist_list))
    }

    async fn songs_of_playlist(
        &self,
        request: Request<proto::PlaylistRequest>,
    ) -> GrpcResult<proto::SongList> {
        let playlist_id = request.into_inner().playlist_id;
        reply(self.catalog.songs_of_playlist(&playlist_id).map(|songs| {
            proto::SongList {
                songs: songs.into_iter().map(proto::Song::from).collect(),
            }
        }))
    }

    async fn playlists_containing_song(
        &self,
        request: Request<proto::SongRequest>,
    ) -> GrpcResult<proto::PlaylistList> {
        let song_id = request.into_inner().song_id;
        reply(
            self.catalog
                .playlists_containing_song(&song_id)
                .map(playlist_list),
        )
    }

    async fn playlist_details(
        &self,
        request: Request<proto::IdRequest>,
    ) -> GrpcResult<proto::PlaylistDetails> {
        reply(self.catalog.playlist_details(&request.into_inner().id))
    }

    async fn statistics(&self, _request: Request<proto::Empty>) -> GrpcResult<proto::Statistics> {
        reply(self.catalog.statistics())
    }

    type StreamSongsStream = Pin<Box<dyn Stream<Item = Result<proto::Song, Status>> + Send>>;

    async fn stream_songs(
        &self,
        request: Request<Streaming<proto::SongRequest>>,
    ) -> GrpcResult<Self::StreamSongsStream> {
        let catalog = Arc::clone(&self.catalog);
        let mut inbound = request.into_inner();

        let output = async_stream::try_stream! {
            while let Some(req) = inbound.message().await? {
                match catalog.get_song(&req.song_id) {
                    Ok(song) => yield proto::Song::from(song),
                    Err(CatalogError::NotFound { .. }) => {
                        debug!("StreamSongs skipping unknown song {}", req.song_id);
                    }
                    Err(err) => Err(to_status(err))?,
                }
            }
        };

        Ok(Response::new(Box::pin(output) as Self::StreamSongsStream))
    }
}

fn playlist_list(playlists: Vec<streamcat_common::Playlist>) -> proto::PlaylistList {
    proto::PlaylistList {
        playlists: playlists.into_iter().map(proto::Playlist::from).collect(),
    }
}

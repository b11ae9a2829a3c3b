//! # streamcat common library
//!
//! The protocol-independent core of streamcat:
//! - Data model and error taxonomy
//! - Store: the single owner of catalog state
//! - Query Engine: index-backed derived views
//! - Capability traits consumed by the protocol adapters
//! - Seed loading and configuration

pub mod config;
pub mod error;
mod index;
pub mod model;
pub mod ops;
mod query;
pub mod seed;
pub mod store;
mod table;

pub use error::{CatalogError, CatalogResult, Entity, Error, ErrorKind, Result};
pub use model::{
    NewPlaylist, NewSong, NewUser, Playlist, PlaylistDetails, PlaylistPatch, Song, SongPatch,
    Statistics, User, UserPatch,
};
pub use ops::{Catalog, PlaylistOps, QueryOps, SongOps, UserOps};
pub use seed::SeedData;
pub use store::{SongRefPolicy, Store};

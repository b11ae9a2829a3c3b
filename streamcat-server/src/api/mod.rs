//! Endpoints shared by every HTTP listener

pub mod buildinfo;
pub mod health;

pub use buildinfo::get_build_info;
pub use health::health_routes;

//! Catalog storage: schema, models and queries

pub mod init;
pub mod models;
pub mod tracks;

pub use init::*;
pub use models::*;
pub use tracks::Catalog;

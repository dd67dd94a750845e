//! Persistence layer: storage handle, schema, versioned migrations, and
//! the row-level operations everything else builds on.

pub mod catalog;
pub mod handle;
pub mod migrate;
pub mod models;
pub mod queries;
pub mod schema;
pub mod session;
pub mod version;

pub use handle::Db;

//! SQLite backend for the Waggle timeline store.
//!
//! All database access goes through [`tokio_rusqlite`], which runs the
//! blocking rusqlite calls on their own thread instead of the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

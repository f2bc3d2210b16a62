//! Adapters binding the domain to the outside world: the HTTP surface
//! and the SQLite store.

pub mod http;
pub mod sqlite;

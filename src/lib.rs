extern crate chrono;
#[macro_use]
extern crate diesel;
extern crate thiserror;
extern crate tracing;
extern crate uuid;

pub mod namespace;
pub mod node_store;

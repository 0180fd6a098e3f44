//! HTTP surface for the party protocol

pub mod protocol;
pub mod routes;

pub use routes::build_router;

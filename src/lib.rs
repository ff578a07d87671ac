//! Authoritative simulation core and transport glue for a two-team
//! territory-painting arena shooter.

pub mod constants;
pub mod engine;
pub mod geometry;
pub mod paint;
pub mod server_protocol;
pub mod types;
pub mod world;

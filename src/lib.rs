// Library exports for the hex trail bot
// The host binary and the integration tests both build on these modules

#[macro_use]
extern crate rocket;

pub mod board;
pub mod bot;
pub mod config;
pub mod error;
pub mod graph;
pub mod handler;
pub mod search;
pub mod translator;
pub mod types;
pub mod voronoi;

pub use bot::Bot;
pub use error::EngineError;

pub mod address;
pub mod api;
pub mod colors;
pub mod config;
pub mod errors;
pub mod fields;
pub mod model;
pub mod plan;
pub mod resolve;
pub mod server;
pub mod state;
pub mod tools;

pub use config::{CliArgs, ServerConfig};
pub use errors::EngineError;
pub use server::WorkspaceServer;

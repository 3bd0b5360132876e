pub mod client;
pub mod docs;
pub mod sheets;

pub use client::{GoogleApiClient, TokenSource};

use crate::api::GoogleApiClient;
use crate::config::ServerConfig;
use anyhow::Result;
use std::sync::Arc;

/// Process-wide state: configuration and the API client, nothing else.
///
/// No document or spreadsheet state lives here. Every logical operation
/// re-reads remote metadata before computing indices, so two concurrent
/// operations never coordinate through this struct; last call wins.
pub struct AppState {
    config: Arc<ServerConfig>,
    api: GoogleApiClient,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Result<Self> {
        let api = GoogleApiClient::new(&config)?;
        Ok(Self { config, api })
    }

    pub fn config(&self) -> Arc<ServerConfig> {
        self.config.clone()
    }

    pub fn api(&self) -> &GoogleApiClient {
        &self.api
    }
}

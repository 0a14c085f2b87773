// src/state.rs
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::completion::{CompletionClient, OpenAiClient};

pub type SharedState = Arc<AppState>;

/// Per-process state shared by all requests. The adapter itself is stateless;
/// requests never observe each other.
pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client =
            OpenAiClient::new(config).context("failed to build the completion client")?;
        Ok(Self { completion: Arc::new(client) })
    }

    /// Used by tests to inject a fake adapter.
    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self { completion: client }
    }
}

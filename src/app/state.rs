//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::party::PartyService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub party: PartyService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let party = PartyService::new(config.eviction_timeout);

        Self {
            config: Arc::new(config),
            party,
        }
    }
}

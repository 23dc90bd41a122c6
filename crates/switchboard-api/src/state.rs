use std::sync::Arc;

use switchboard_agent::ChatAgent;
use switchboard_persist::PersistenceClient;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Built once in `main`; handlers only ever clone the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent: Arc<ChatAgent>,
    pub store: Arc<dyn PersistenceClient>,
}

impl AppState {
    pub fn new(config: Config, agent: ChatAgent) -> Self {
        let store = agent.store();
        Self {
            config: Arc::new(config),
            agent: Arc::new(agent),
            store,
        }
    }
}

//! Shared application state.

use std::sync::Arc;

use pinpoint_client::Transport;

/// Shared application state.
pub struct AppState {
    /// Transport used to reach the model provider.
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self { transport })
    }
}

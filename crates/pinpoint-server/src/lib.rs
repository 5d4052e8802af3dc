//! PinPoint Chat Proxy Library
//!
//! Serves `POST /api/chat`: takes the conversation and highlighted span from
//! a client, builds the provider request and relays the reply.

pub mod config;
pub mod http;
pub mod state;

pub use config::{Config, ConfigError};
pub use state::AppState;

pub mod config;
pub mod connection;
pub mod error;
pub mod hub;
pub mod observability;
pub mod route;
pub mod server;
pub mod websocket_listener;

pub use config::{Args, ServerConfig};
pub use connection::ConnectionSink;
pub use error::{Result, ServerError};
pub use hub::{HubCommand, HubHandle};
pub use observability::LogConfig;
pub use route::{create_relay_route, ApiInfo, AppState, Endpoints, HealthResponse};
pub use server::RelayServer;

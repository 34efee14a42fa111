//! Warehouse Insight Agent: an A2A front-end answering warehouse data
//! queries about stock movements and shipping.
//!
//! The binary serves four surfaces from one router: the JSON-RPC protocol
//! endpoint on `POST /`, agent card discovery, a liveness text and health
//! check, and an Open Resource Discovery document read from disk.

pub mod agent;
pub mod app;
pub mod card;
pub mod config;
pub mod executor;
pub mod routes;

pub use agent::{InsightAgent, WarehouseAgent};
pub use app::{create_app, create_app_with_agent, AppState};
pub use card::agent_card;
pub use config::{Config, ConfigError};
pub use executor::InsightExecutor;

//! # Telemetry Broadcast Server Library
//!
//! This library implements the authoritative simulation and broadcast side
//! of the telemetry dashboard: a fixed fleet of simulated vehicles moving
//! inside a bounding region, plus a population density sample, pushed to
//! every connected WebSocket subscriber once per second.
//!
//! ## Core Responsibilities
//!
//! ### Simulation State
//! Owns the vehicle fleet and its kinematics. Vehicles are spawned once at
//! startup with random position, bearing, and speed, then advanced every
//! tick by the measured elapsed wall-clock time. Positions are clamped to
//! the configured bounding region; the fleet size never changes.
//!
//! ### Broadcast Loop
//! A repeating timer drives the per-tick sequence: measure elapsed time,
//! advance the fleet, regenerate the population sample, serialize both as
//! GeoJSON envelopes, and fan them out to all live subscribers. Delivery is
//! best-effort; a slow or closed subscriber is skipped for that tick and
//! never delays the others.
//!
//! ### Connection Lifecycle
//! Each subscriber is greeted with a single `hello` envelope before any
//! broadcast traffic, then receives whatever subsequent ticks produce.
//! There is no replay or backlog. Disconnected subscribers are removed by
//! their own connection tasks.
//!
//! ## Module Organization
//!
//! - [`config`]: validated runtime configuration, fail-fast at startup
//! - [`simulation`]: vehicle state, kinematics, and clamping
//! - [`population`]: weighted density point sampling
//! - [`client_manager`]: subscriber registry and best-effort fanout
//! - [`network`]: WebSocket accept loop and per-connection pump tasks
//! - [`broadcast`]: the tick loop composing all of the above
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{broadcast, network};
//! use server::client_manager::ClientManager;
//! use server::config::Config;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let listener = TcpListener::bind(("127.0.0.1", config.port)).await?;
//!     let clients = Arc::new(RwLock::new(ClientManager::new()));
//!
//!     tokio::spawn(network::serve(listener, Arc::clone(&clients)));
//!     broadcast::run(config, clients).await;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod client_manager;
pub mod config;
pub mod network;
pub mod population;
pub mod simulation;

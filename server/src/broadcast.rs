//! The broadcast tick loop
//!
//! A single repeating timer drives the per-tick sequence: measure elapsed
//! wall-clock time, advance the fleet, regenerate the population sample,
//! serialize both envelopes, and fan them out. The simulation state is
//! owned by this task alone; only the subscriber registry is shared.

use crate::client_manager::ClientManager;
use crate::config::Config;
use crate::population;
use crate::simulation::SimulationState;
use log::{debug, error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::ServerMessage;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

/// Drives the simulation on the configured cadence and broadcasts to every
/// connected subscriber. Runs until the task is dropped. Expects a
/// validated [`Config`].
pub async fn run(config: Config, clients: Arc<RwLock<ClientManager>>) {
    // The loop task owns its own rng; ThreadRng is not Send.
    let mut rng = StdRng::from_entropy();
    let mut state = SimulationState::new(config.bounds, config.vehicle_count, &mut rng);

    let mut interval_timer = interval(Duration::from_millis(config.tick_millis));
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_tick = Instant::now();
    let mut tick: u64 = 0;

    // Skip the first tick since it fires immediately
    interval_timer.tick().await;

    loop {
        interval_timer.tick().await;

        // Measured elapsed time, not the nominal interval, so the
        // simulation's effective speed stays correct under scheduler
        // jitter or system load.
        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        state.advance(dt, &mut rng);
        let sample = population::sample_population(state.bounds(), &mut rng);

        let vehicles = ServerMessage::Vehicles {
            data: state.to_feature_collection(),
        };
        let population = ServerMessage::Population {
            data: population::to_feature_collection(&sample),
        };

        // Both envelopes go out under one registry guard, so a subscriber
        // registered mid-tick never sees population before vehicles.
        let mut queued = 0;
        {
            let registry = clients.read().await;
            for message in [&vehicles, &population] {
                match serde_json::to_string(message) {
                    Ok(text) => queued = registry.broadcast(&text),
                    Err(e) => error!("Failed to serialize broadcast: {}", e),
                }
            }
        }

        tick += 1;
        if tick % 60 == 0 {
            debug!(
                "Tick {}: dt {:.3}s, {} population points, {} subscribers reached",
                tick,
                dt,
                sample.len(),
                queued
            );
        }
    }
}

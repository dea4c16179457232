use clap::Parser;
use log::info;
use server::client_manager::ClientManager;
use server::config::Config;
use server::{broadcast, network};
use shared::BoundingBox;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Main-method of the application.
/// Parses command-line arguments, validates the configuration, then runs
/// the accept loop and the broadcast loop until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value_t = shared::DEFAULT_PORT, env = "PORT")]
        port: u16,
        /// Broadcast interval in milliseconds
        #[clap(short, long, default_value_t = shared::DEFAULT_TICK_MILLIS)]
        tick_millis: u64,
        /// Number of simulated vehicles
        #[clap(short = 'n', long, default_value_t = shared::DEFAULT_VEHICLE_COUNT)]
        vehicles: usize,
        /// Bounding region as minLng,minLat,maxLng,maxLat
        #[clap(short, long, default_value_t = shared::DEFAULT_BOUNDS)]
        bounds: BoundingBox,
    }

    // Parse command line arguments
    let args = Args::parse();

    let config = Config {
        host: args.host,
        port: args.port,
        tick_millis: args.tick_millis,
        vehicle_count: args.vehicles,
        bounds: args.bounds,
    };
    config.validate()?;

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Telemetry server on ws://{}", listener.local_addr()?);

    // Subscriber registry shared between the accept loop and the
    // broadcast loop
    let clients = Arc::new(RwLock::new(ClientManager::new()));

    // Spawn network thread
    let server_handle = {
        let clients = Arc::clone(&clients);
        tokio::spawn(network::serve(listener, clients))
    };

    // Spawn broadcast loop thread
    let broadcast_handle = {
        let clients = Arc::clone(&clients);
        tokio::spawn(broadcast::run(config, clients))
    };

    // Handle shutdown gracefully
    tokio::select! {
        result = server_handle => {
            if let Err(e) = result {
                eprintln!("Network task panicked: {}", e);
            }
        }
        result = broadcast_handle => {
            if let Err(e) = result {
                eprintln!("Broadcast task panicked: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}

use anyhow::Result;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;
use voltaic::session::ChargingSession;
use voltaic::vehicle::Vehicle;
use voltaic::{Config, SimulatedValidator};

/// Scripted stand-in for the presentation layer: runs one charge cycle
/// against the simulator and prints snapshots until Ctrl-C.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
    voltaic::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Voltaic {} starting up", env!("APP_VERSION"));

    let vehicle = Vehicle::new(&config.vehicle, &config.charging);
    let session = ChargingSession::new(
        vehicle.clone(),
        Arc::new(SimulatedValidator::new()),
        &config.charging,
    );

    session.start();
    let outcome = session.authorize("qris-demo-payload").await;
    info!("Authorization outcome: {:?}", outcome);

    let mut ticker = tokio::time::interval(Duration::from_secs(5));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            _ = ticker.tick() => {
                let v = vehicle.snapshot();
                let s = session.snapshot();
                info!(
                    "battery={}% range={}km billing={} status={:?} progress={:.0}% stats={}",
                    v.battery_percent,
                    v.battery_range_km,
                    v.billing.amount_due,
                    s.status,
                    s.progress * 100.0,
                    session.stats()
                );
            }
        }
    }

    session.shutdown();
    vehicle.shutdown();
    Ok(())
}

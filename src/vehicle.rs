//! Simulated vehicle state for Voltaic
//!
//! This module owns the fabricated telemetry (odometer, battery, derived
//! range, component temperatures) and the billing record. State is
//! published through a `watch` channel so every reader observes a
//! consistent snapshot; the battery decay ticker runs as its own
//! cancellable background task for the lifetime of the vehicle.

use crate::config::{ChargingConfig, VehicleConfig};
use crate::format::format_rupiah;
use crate::logging::get_logger;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{Duration, Instant, interval_at};
use tokio_util::sync::CancellationToken;

/// Component temperature labels as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temps {
    pub motor: String,
    pub inverter: String,
    pub battery: String,
}

/// Display-only severity derived from a temperature label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempStatus {
    Normal,
    High,
    Critical,
}

/// Classify a free-text temperature label by keyword match
pub fn classify_temp(label: &str) -> TempStatus {
    let lower = label.to_lowercase();
    if lower.contains("over") || lower.contains("crit") {
        TempStatus::Critical
    } else if lower.contains("high") {
        TempStatus::High
    } else {
        TempStatus::Normal
    }
}

/// Outstanding billing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Amount due as a display string, e.g. "Rp 200.000"
    pub amount_due: String,

    /// Due date as a display string, or a placeholder such as "--"
    pub due_date: String,
}

/// Point-in-time read of the vehicle state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub odometer_km: u32,
    pub mode: String,
    pub battery_percent: u8,
    pub battery_range_km: u32,
    pub temps: Temps,
    pub billing: BillingRecord,
}

/// Handle to the simulated vehicle
///
/// Cheap to clone; all clones share the same underlying state. The decay
/// ticker keeps running until [`Vehicle::shutdown`] is called.
#[derive(Debug, Clone)]
pub struct Vehicle {
    snapshot_tx: watch::Sender<VehicleSnapshot>,
    rated_range_km: u32,
    decay: CancellationToken,
    logger: crate::logging::StructuredLogger,
}

fn derive_range_km(battery_percent: u8, rated_range_km: u32) -> u32 {
    ((f64::from(battery_percent) / 100.0) * f64::from(rated_range_km)).round() as u32
}

impl Vehicle {
    /// Create the vehicle and start its background decay ticker
    ///
    /// Must be called within a tokio runtime.
    pub fn new(vehicle: &VehicleConfig, charging: &ChargingConfig) -> Self {
        let logger = get_logger("vehicle");
        let initial = VehicleSnapshot {
            odometer_km: vehicle.odometer_km,
            mode: vehicle.mode.clone(),
            battery_percent: vehicle.battery_percent.min(100),
            battery_range_km: derive_range_km(
                vehicle.battery_percent.min(100),
                vehicle.rated_range_km,
            ),
            temps: Temps {
                motor: vehicle.motor_temp.clone(),
                inverter: vehicle.inverter_temp.clone(),
                battery: vehicle.battery_temp.clone(),
            },
            billing: BillingRecord {
                amount_due: vehicle.billing_amount_due.clone(),
                due_date: vehicle.billing_due_date.clone(),
            },
        };

        let (snapshot_tx, _) = watch::channel(initial);
        let decay = CancellationToken::new();

        let this = Self {
            snapshot_tx,
            rated_range_km: vehicle.rated_range_km,
            decay: decay.clone(),
            logger,
        };

        this.spawn_decay(Duration::from_secs(charging.decay_interval_secs), decay);
        this.logger.info("Vehicle simulator started");
        this
    }

    fn spawn_decay(&self, period: Duration, token: CancellationToken) {
        let vehicle = self.clone();
        tokio::spawn(async move {
            // First decay step lands one full period after startup
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => vehicle.decay_tick(),
                }
            }
            vehicle.logger.debug("Decay ticker stopped");
        });
    }

    /// Pure read of the current state
    pub fn snapshot(&self) -> VehicleSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to state changes for re-render-on-change consumers
    pub fn subscribe(&self) -> watch::Receiver<VehicleSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Replace the drive mode label unconditionally
    pub fn set_mode(&self, mode: impl Into<String>) {
        let mode = mode.into();
        self.snapshot_tx.send_modify(|snap| snap.mode = mode);
    }

    /// Zero the outstanding amount; the due date is left unchanged
    pub fn mark_paid(&self) {
        self.snapshot_tx
            .send_modify(|snap| snap.billing.amount_due = format_rupiah(0));
        self.logger.info("Billing marked as paid");
    }

    /// Replace both billing fields atomically
    pub fn set_billing(&self, billing: BillingRecord) {
        self.logger.info(&format!(
            "Billing set to {} due {}",
            billing.amount_due, billing.due_date
        ));
        self.snapshot_tx.send_modify(|snap| snap.billing = billing);
    }

    /// Advance the odometer; the simulation never moves it otherwise
    pub fn advance_odometer(&self, km: u32) {
        self.snapshot_tx
            .send_modify(|snap| snap.odometer_km = snap.odometer_km.saturating_add(km));
    }

    /// Apply one battery decay step
    ///
    /// Battery percent and derived range change in the same atomic update,
    /// so no reader can observe them out of sync.
    pub fn decay_tick(&self) {
        let rated = self.rated_range_km;
        self.snapshot_tx.send_modify(|snap| {
            snap.battery_percent = snap.battery_percent.saturating_sub(1);
            snap.battery_range_km = derive_range_km(snap.battery_percent, rated);
        });
    }

    /// Stop the background decay ticker
    ///
    /// Stopping the vehicle does not affect any charging session ticker.
    pub fn shutdown(&self) {
        self.decay.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_vehicle() -> Vehicle {
        let config = Config::default();
        Vehicle::new(&config.vehicle, &config.charging)
    }

    #[tokio::test]
    async fn classifies_temperature_labels() {
        assert_eq!(classify_temp("NORMAL"), TempStatus::Normal);
        assert_eq!(classify_temp("HIGH"), TempStatus::High);
        assert_eq!(classify_temp("OVER HEAT"), TempStatus::Critical);
        assert_eq!(classify_temp("critical"), TempStatus::Critical);
        assert_eq!(classify_temp(""), TempStatus::Normal);
    }

    #[tokio::test]
    async fn range_always_tracks_percent() {
        let vehicle = test_vehicle();
        for _ in 0..250 {
            vehicle.decay_tick();
            let snap = vehicle.snapshot();
            assert!(snap.battery_percent <= 100);
            assert_eq!(
                snap.battery_range_km,
                derive_range_km(snap.battery_percent, 200)
            );
        }
        // Clamped at zero, never wraps
        assert_eq!(vehicle.snapshot().battery_percent, 0);
        assert_eq!(vehicle.snapshot().battery_range_km, 0);
        vehicle.shutdown();
    }

    #[tokio::test]
    async fn mark_paid_zeroes_amount_and_keeps_due_date() {
        let vehicle = test_vehicle();
        let before = vehicle.snapshot().billing;
        vehicle.mark_paid();
        let after = vehicle.snapshot().billing;
        assert_eq!(after.amount_due, "Rp 0");
        assert_eq!(after.due_date, before.due_date);
        vehicle.shutdown();
    }

    #[tokio::test]
    async fn set_billing_replaces_both_fields() {
        let vehicle = test_vehicle();
        vehicle.set_billing(BillingRecord {
            amount_due: "Rp 75.000".to_string(),
            due_date: "--".to_string(),
        });
        let billing = vehicle.snapshot().billing;
        assert_eq!(billing.amount_due, "Rp 75.000");
        assert_eq!(billing.due_date, "--");
        vehicle.shutdown();
    }

    #[tokio::test]
    async fn set_mode_is_unvalidated() {
        let vehicle = test_vehicle();
        vehicle.set_mode("Eco");
        assert_eq!(vehicle.snapshot().mode, "Eco");
        vehicle.set_mode("Ludicrous");
        assert_eq!(vehicle.snapshot().mode, "Ludicrous");
        vehicle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn decay_ticker_runs_on_its_interval() {
        let vehicle = test_vehicle();
        assert_eq!(vehicle.snapshot().battery_percent, 100);

        // Just before the first period: untouched
        tokio::time::sleep(Duration::from_millis(7_900)).await;
        assert_eq!(vehicle.snapshot().battery_percent, 100);

        // Two full periods
        tokio::time::sleep(Duration::from_millis(8_200)).await;
        assert_eq!(vehicle.snapshot().battery_percent, 98);

        vehicle.shutdown();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(vehicle.snapshot().battery_percent, 98);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let vehicle = test_vehicle();
        let mut rx = vehicle.subscribe();
        vehicle.set_mode("Normal");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().mode, "Normal");
        vehicle.shutdown();
    }
}

//! Charging session state machine for Voltaic
//!
//! This module coordinates one charge cycle: awaiting scan authorization,
//! charging with 1 Hz progress ticks, completion, and billing resolution
//! by re-scan or manual entry. The session reads and writes the vehicle's
//! billing record but never touches its battery simulation; the decay
//! ticker runs independently of any session activity.

use crate::config::ChargingConfig;
use crate::format::{format_elapsed, format_rupiah, parse_amount};
use crate::logging::get_logger;
use crate::payment::PaymentValidator;
use crate::vehicle::{BillingRecord, Vehicle};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::time::{Duration, Instant, interval_at};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Session status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChargeStatus {
    /// No session in progress
    Idle,

    /// Waiting for a payment payload to be scanned and authorized
    AwaitingScan,

    /// Actively charging, progress advancing once per tick
    Charging,

    /// Charge finished, billing not yet resolved
    Complete,

    /// Billing-only authorization cycle opened from `Complete`
    ResolvingBilling,
}

/// Point-in-time read of the session state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: ChargeStatus,

    /// Fraction charged, 0.0..=1.0
    pub progress: f64,

    /// Seconds spent charging in the current cycle
    pub elapsed_seconds: u64,
}

/// Result of an `authorize` call, surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Authorization accepted; the session is now charging
    ChargingStarted,

    /// Billing-only authorization accepted; the session returned to idle
    BillingSettled,

    /// The validator rejected the payload; the session did not move
    Rejected { message: String },

    /// Duplicate scan, or a response that arrived after cancellation;
    /// nothing was applied
    Discarded,
}

struct SessionCore {
    status: ChargeStatus,
    elapsed_seconds: u64,
    progress: f64,

    /// AwaitingScan was entered via pause(); a successful re-authorization
    /// resumes without resetting progress/elapsed
    resume_pending: bool,

    /// Bumped on every accepted scan and on cancel, so an in-flight
    /// validator response can be recognized as stale
    auth_epoch: u64,
    auth_in_flight: bool,

    /// Id of the current charge cycle, fresh per scan-started session
    charge_id: Option<Uuid>,

    /// Cancellation handle for the active progress ticker
    ticker: Option<CancellationToken>,
}

/// Charging session handle
///
/// Cheap to clone; all clones drive the same state machine.
#[derive(Clone)]
pub struct ChargingSession {
    core: Arc<Mutex<SessionCore>>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    vehicle: Vehicle,
    validator: Arc<dyn PaymentValidator>,
    tick_period: Duration,
    progress_step: f64,
    logger: crate::logging::StructuredLogger,
}

impl ChargingSession {
    /// Create an idle session bound to a vehicle and a payment validator
    pub fn new(
        vehicle: Vehicle,
        validator: Arc<dyn PaymentValidator>,
        charging: &ChargingConfig,
    ) -> Self {
        let core = SessionCore {
            status: ChargeStatus::Idle,
            elapsed_seconds: 0,
            progress: 0.0,
            resume_pending: false,
            auth_epoch: 0,
            auth_in_flight: false,
            charge_id: None,
            ticker: None,
        };
        let (snapshot_tx, _) = watch::channel(SessionSnapshot {
            status: ChargeStatus::Idle,
            progress: 0.0,
            elapsed_seconds: 0,
        });

        Self {
            core: Arc::new(Mutex::new(core)),
            snapshot_tx,
            vehicle,
            validator,
            tick_period: Duration::from_millis(charging.tick_interval_ms),
            progress_step: charging.progress_step,
            logger: get_logger("session"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, core: &SessionCore) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            status: core.status,
            progress: core.progress,
            elapsed_seconds: core.elapsed_seconds,
        });
    }

    /// Pure read of the current session state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to session changes for re-render-on-change consumers
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Open a scan cycle for a fresh charge (`Idle` -> `AwaitingScan`)
    pub fn start(&self) {
        let mut core = self.lock();
        if core.status != ChargeStatus::Idle {
            self.logger
                .debug(&format!("start ignored in {:?}", core.status));
            return;
        }
        core.status = ChargeStatus::AwaitingScan;
        core.resume_pending = false;
        self.publish(&core);
        self.logger.info("Awaiting payment scan");
    }

    /// Abort the pending scan cycle
    ///
    /// Any authorization still in flight is discarded when it resolves.
    pub fn cancel(&self) {
        let mut core = self.lock();
        match core.status {
            ChargeStatus::AwaitingScan => core.status = ChargeStatus::Idle,
            ChargeStatus::ResolvingBilling => core.status = ChargeStatus::Complete,
            _ => return,
        }
        core.auth_epoch += 1;
        core.auth_in_flight = false;
        core.resume_pending = false;
        self.publish(&core);
        self.logger.info("Scan cancelled");
    }

    /// Pause an active charge (`Charging` -> `AwaitingScan`)
    ///
    /// Progress and elapsed time are retained; resuming requires a fresh
    /// scan authorization.
    pub fn pause(&self) {
        let mut core = self.lock();
        if core.status != ChargeStatus::Charging {
            return;
        }
        if let Some(token) = core.ticker.take() {
            token.cancel();
        }
        core.status = ChargeStatus::AwaitingScan;
        core.resume_pending = true;
        self.publish(&core);
        self.logger
            .info("Charging paused; fresh scan required to resume");
    }

    /// Open a billing-only scan cycle after completion
    /// (`Complete` -> `ResolvingBilling`)
    pub fn resolve_by_scan(&self) {
        let mut core = self.lock();
        if core.status != ChargeStatus::Complete {
            return;
        }
        core.status = ChargeStatus::ResolvingBilling;
        self.publish(&core);
        self.logger.info("Awaiting scan to settle billing");
    }

    /// Settle billing after completion by manual amount entry
    ///
    /// Returns false and leaves all state untouched unless `digits`
    /// parses to a positive integer and the session is `Complete`.
    pub fn resolve_manually(&self, digits: &str) -> bool {
        let Some(amount) = parse_amount(digits) else {
            self.logger
                .debug(&format!("Manual amount rejected: {:?}", digits));
            return false;
        };
        let mut core = self.lock();
        if core.status != ChargeStatus::Complete {
            return false;
        }
        self.vehicle.set_billing(BillingRecord {
            amount_due: format_rupiah(amount),
            due_date: "--".to_string(),
        });
        core.status = ChargeStatus::Idle;
        self.publish(&core);
        self.logger.info("Billing entered manually");
        true
    }

    /// Validate a scanned payment payload and apply the result
    ///
    /// Only accepted while `AwaitingScan` or `ResolvingBilling`; a second
    /// scan while one is pending is discarded, as is a response that
    /// resolves after `cancel()`. The session stays scannable for the
    /// whole validator round trip.
    pub async fn authorize(&self, payload: &str) -> AuthOutcome {
        let epoch = {
            let mut core = self.lock();
            let scanning = matches!(
                core.status,
                ChargeStatus::AwaitingScan | ChargeStatus::ResolvingBilling
            );
            if !scanning {
                return AuthOutcome::Discarded;
            }
            if core.auth_in_flight {
                self.logger.debug("Duplicate scan ignored while pending");
                return AuthOutcome::Discarded;
            }
            core.auth_in_flight = true;
            core.auth_epoch += 1;
            core.auth_epoch
        };

        let outcome = self.validator.validate(payload).await;

        let mut core = self.lock();
        if core.auth_epoch != epoch {
            self.logger.debug("Stale authorization response discarded");
            return AuthOutcome::Discarded;
        }
        core.auth_in_flight = false;

        if !outcome.ok {
            let message = outcome
                .message
                .unwrap_or_else(|| "Payment validation failed".to_string());
            self.logger
                .warn(&format!("Payment rejected: {}", message));
            return AuthOutcome::Rejected { message };
        }

        let amount = outcome.data.as_ref().map_or(0, |d| d.amount);
        let billing = BillingRecord {
            amount_due: format_rupiah(amount),
            due_date: chrono::Local::now().format("%d/%m/%y").to_string(),
        };

        match core.status {
            ChargeStatus::AwaitingScan => {
                // Billing is written before the session becomes Charging
                self.vehicle.set_billing(billing);
                if !core.resume_pending {
                    core.progress = 0.0;
                    core.elapsed_seconds = 0;
                    core.charge_id = Some(Uuid::new_v4());
                }
                core.resume_pending = false;
                core.status = ChargeStatus::Charging;
                let token = CancellationToken::new();
                core.ticker = Some(token.clone());
                self.publish(&core);
                if let Some(id) = core.charge_id {
                    self.logger
                        .info(&format!("Charging started, charge_id={}", id));
                }
                drop(core);
                self.spawn_ticker(token);
                AuthOutcome::ChargingStarted
            }
            ChargeStatus::ResolvingBilling => {
                self.vehicle.set_billing(billing);
                core.status = ChargeStatus::Idle;
                self.publish(&core);
                self.logger.info("Billing settled by scan");
                AuthOutcome::BillingSettled
            }
            // Unreachable in practice: leaving a scannable status bumps
            // the epoch, which is checked above
            _ => AuthOutcome::Discarded,
        }
    }

    /// Advance the charge by one tick
    ///
    /// Progress clamps at exactly 1.0 and the clamping tick is the one
    /// that completes the session. Outside `Charging` the session is
    /// frozen and ticks are ignored.
    pub fn tick(&self) {
        let mut core = self.lock();
        if core.status != ChargeStatus::Charging {
            return;
        }
        core.elapsed_seconds += 1;
        core.progress = (core.elapsed_seconds as f64 * self.progress_step).min(1.0);
        if core.progress >= 1.0 {
            core.status = ChargeStatus::Complete;
            if let Some(token) = core.ticker.take() {
                token.cancel();
            }
            self.logger.info(&format!(
                "Charging complete after {}",
                format_elapsed(core.elapsed_seconds)
            ));
        }
        self.publish(&core);
    }

    fn spawn_ticker(&self, token: CancellationToken) {
        let session = self.clone();
        tokio::spawn(async move {
            // First step lands one full period after charging starts
            let mut ticker = interval_at(Instant::now() + session.tick_period, session.tick_period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => session.tick(),
                }
            }
            session.logger.debug("Progress ticker stopped");
        });
    }

    /// Session statistics for the presentation layer
    pub fn stats(&self) -> serde_json::Value {
        let core = self.lock();
        let mut stats = serde_json::Map::new();
        stats.insert(
            "charging".to_string(),
            (core.status == ChargeStatus::Charging).into(),
        );
        stats.insert(
            "progress_percent".to_string(),
            ((core.progress * 100.0).round() as u64).into(),
        );
        stats.insert(
            "elapsed".to_string(),
            format_elapsed(core.elapsed_seconds).into(),
        );
        stats.insert(
            "charge_id".to_string(),
            match core.charge_id {
                Some(id) => id.to_string().into(),
                None => serde_json::Value::Null,
            },
        );
        serde_json::Value::Object(stats)
    }

    /// Stop the progress ticker, if one is running
    ///
    /// Stopping the session does not affect the vehicle's decay ticker.
    pub fn shutdown(&self) {
        let mut core = self.lock();
        if let Some(token) = core.ticker.take() {
            token.cancel();
        }
    }
}

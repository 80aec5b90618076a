//! # Voltaic - simulated EV telemetry, charging session and billing core
//!
//! An in-memory simulation of an electric vehicle's dashboard state and
//! its charge-and-pay flow: fabricated telemetry with a slow battery
//! decay, a charging session state machine driven by scan-to-pay
//! authorization, and a billing record shared between the two.
//!
//! ## Architecture
//!
//! The crate follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `vehicle`: Simulated telemetry, billing state, and the decay ticker
//! - `session`: Charging session state machine and progress ticker
//! - `payment`: Payment validator contract and the simulated heuristic stub
//! - `format`: Currency and elapsed-time display helpers
//!
//! The presentation layer is out of scope: it reads snapshots (or
//! subscribes to their `watch` channels) and issues the commands exposed
//! here. Both periodic activities (battery decay, charge progress) are
//! independently cancellable background tasks.

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod payment;
pub mod session;
pub mod vehicle;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, VoltaicError};
pub use payment::{PaymentValidator, SimulatedValidator};
pub use session::{AuthOutcome, ChargeStatus, ChargingSession};
pub use vehicle::Vehicle;

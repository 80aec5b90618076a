//! Payment validation collaborator for Voltaic
//!
//! The session only consumes the narrow `PaymentValidator` contract; the
//! bundled implementation is the simulated heuristic validator used by the
//! demo. A production deployment would put a real gateway client behind
//! the same trait.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Invoice data attached to an accepted payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentData {
    /// Invoice reference issued by the validator
    pub invoice: String,

    /// Amount in whole currency units (no minor units)
    pub amount: u64,
}

/// Outcome of validating a scanned payment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Whether the payload was accepted
    pub ok: bool,

    /// Human-readable rejection reason, when not accepted
    pub message: Option<String>,

    /// Invoice data, when accepted
    pub data: Option<PaymentData>,
}

impl ValidationOutcome {
    /// Build an accepted outcome carrying invoice data
    pub fn accepted(invoice: impl Into<String>, amount: u64) -> Self {
        Self {
            ok: true,
            message: None,
            data: Some(PaymentData {
                invoice: invoice.into(),
                amount,
            }),
        }
    }

    /// Build a rejected outcome with a reason
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Payment validator trait
///
/// The call is asynchronous and must never partially mutate vehicle or
/// session state; the session applies accepted outcomes itself.
#[async_trait::async_trait]
pub trait PaymentValidator: Send + Sync {
    async fn validate(&self, payload: &str) -> ValidationOutcome;
}

/// Simulated validator accepting payloads via crude string heuristics
///
/// Mirrors the demo backend: QRIS-ish or JSON-ish payloads settle against
/// a fixed invoice, purely numeric payloads get a derived invoice, and
/// everything else is rejected.
pub struct SimulatedValidator {
    latency: Duration,
}

impl SimulatedValidator {
    /// Create a validator with the default simulated network latency
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(700),
        }
    }

    /// Create a validator with a custom latency (useful for tests)
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PaymentValidator for SimulatedValidator {
    async fn validate(&self, payload: &str) -> ValidationOutcome {
        // Simulate a network round trip to the payment backend
        tokio::time::sleep(self.latency).await;
        classify_payload(payload)
    }
}

/// Heuristic classification of a raw scanned payload
pub fn classify_payload(payload: &str) -> ValidationOutcome {
    if payload.is_empty() {
        return ValidationOutcome::rejected("Empty payload");
    }

    let lower = payload.to_lowercase();
    if lower.contains("qris") || lower.contains("payment") || payload.trim_start().starts_with('{')
    {
        return ValidationOutcome::accepted("SIM-INV-001", 200_000);
    }

    // Numeric payloads (e.g. scanned code with digits)
    let trimmed = payload.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return ValidationOutcome::accepted(format!("NUM-{}", trimmed), 50_000);
    }

    ValidationOutcome::rejected("Unrecognized payment payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_payload() {
        let outcome = classify_payload("");
        assert!(!outcome.ok);
        assert_eq!(outcome.message.as_deref(), Some("Empty payload"));
    }

    #[test]
    fn accepts_qris_and_json_payloads() {
        for payload in ["QRIS-ABC", "my-payment-code", "{\"invoice\":1}"] {
            let outcome = classify_payload(payload);
            assert!(outcome.ok, "expected {payload:?} to be accepted");
            let data = outcome.data.unwrap();
            assert_eq!(data.invoice, "SIM-INV-001");
            assert_eq!(data.amount, 200_000);
        }
    }

    #[test]
    fn accepts_numeric_payloads_with_derived_invoice() {
        let outcome = classify_payload("123456");
        assert!(outcome.ok);
        let data = outcome.data.unwrap();
        assert_eq!(data.invoice, "NUM-123456");
        assert_eq!(data.amount, 50_000);
    }

    #[test]
    fn rejects_unrecognized_payloads() {
        let outcome = classify_payload("hello world");
        assert!(!outcome.ok);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Unrecognized payment payload")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_validator_applies_latency() {
        let validator = SimulatedValidator::new();
        let started = tokio::time::Instant::now();
        let outcome = validator.validate("qris-demo").await;
        assert!(outcome.ok);
        assert!(started.elapsed() >= Duration::from_millis(700));
    }
}

use crate::error::{Result, SdkError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A payment request as submitted by the host for an incoming order.
///
/// Amounts are integer minor currency units (kopecks, cents). Requests are
/// created per incoming request and never mutated after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub return_url: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Lifecycle status of a tracked payment.
///
/// Transitions are one-directional: `Created` may move to any terminal
/// state, terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Created,
    Success,
    Failed,
    Canceled,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        self != PaymentStatus::Created
    }
}

/// The persisted/tracked payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub status: PaymentStatus,
    pub return_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Moves the payment to `next`, enforcing one-directional transitions.
    pub fn transition(&mut self, next: PaymentStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(SdkError::ValidationError(format!(
                "payment {} already in terminal state {:?}",
                self.id, self.status
            )));
        }
        if next == PaymentStatus::Created {
            return Err(SdkError::ValidationError(
                "payment cannot transition back to created".to_string(),
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// The gateway-ready payload produced by a payment link generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentGenerationResult {
    pub payment_data: serde_json::Map<String, serde_json::Value>,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub return_url: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Read-only payment settings snapshot returned per call.
///
/// Callers must not assume the same value is returned across calls; each
/// call produces a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub currency: String,
    pub sandbox_mode: bool,
    /// Auto-confirm timeout in seconds.
    pub auto_confirm_timeout: u64,
    #[serde(default)]
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
}

/// Builds an order id of the form `order_<unixSeconds>_<amountMinorUnits>`.
///
/// The embedded amount always equals the request amount exactly.
pub fn new_order_id(amount: i64) -> String {
    format!("order_{}_{}", Utc::now().timestamp(), amount)
}

/// Converts an integer minor-unit amount to its exact two-fraction-digit
/// display value: `1000 -> "10.00"`, `50 -> "0.50"`.
pub fn display_amount(minor_units: i64) -> String {
    Decimal::new(minor_units, 2).to_string()
}

/// Reference request validation policy.
///
/// Rejects non-positive amounts (embedding the offending value), empty
/// descriptions, and empty return URLs. Large positive amounts are accepted
/// without an upper bound.
pub fn validate_payment_request(req: &PaymentRequest) -> Result<()> {
    if req.amount <= 0 {
        return Err(SdkError::ValidationError(format!(
            "amount must be positive, got: {}",
            req.amount
        )));
    }
    if req.description.is_empty() {
        return Err(SdkError::ValidationError(
            "description is required".to_string(),
        ));
    }
    if req.return_url.is_empty() {
        return Err(SdkError::ValidationError(
            "return URL is required".to_string(),
        ));
    }
    Ok(())
}

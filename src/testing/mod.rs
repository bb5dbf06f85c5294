//! Record-and-replay mocks for both capability sets, plus synthetic
//! fixtures for the harness and consumer tests.
//!
//! Each mock instance owns its own recorded-call sequences and counters;
//! construct a fresh instance per test case.

use crate::domain::merchant::{GatewayConfig, MerchantConfig, SecurityPolicy};
use crate::domain::payment::{
    Payment, PaymentGenerationResult, PaymentRequest, PaymentSettings, PaymentStatus,
};
use crate::domain::ports::{ClientHandler, PaymentLinkGenerator};
use crate::error::{Result, SdkError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Mock `ClientHandler` that records every call in order.
#[derive(Default)]
pub struct MockClientHandler {
    merchant: Mutex<Option<Arc<MerchantConfig>>>,
    payment_created_calls: Mutex<Vec<Payment>>,
    payment_success_calls: Mutex<Vec<Payment>>,
    payment_failed_calls: Mutex<Vec<Payment>>,
    payment_canceled_calls: Mutex<Vec<Payment>>,
    validate_request_calls: Mutex<Vec<PaymentRequest>>,
    validate_request_error: Mutex<Option<String>>,
    generator: Mutex<Option<Arc<dyn PaymentLinkGenerator>>>,
}

impl MockClientHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_merchant(&self, merchant: Arc<MerchantConfig>) {
        *lock(&self.merchant) = Some(merchant);
    }

    /// Makes `validate_request` return a `ValidationError` with the given
    /// message until reset or overwritten.
    pub fn set_validate_request_error(&self, message: impl Into<String>) {
        *lock(&self.validate_request_error) = Some(message.into());
    }

    pub fn payment_created_calls(&self) -> Vec<Payment> {
        lock(&self.payment_created_calls).clone()
    }

    pub fn payment_success_calls(&self) -> Vec<Payment> {
        lock(&self.payment_success_calls).clone()
    }

    pub fn payment_failed_calls(&self) -> Vec<Payment> {
        lock(&self.payment_failed_calls).clone()
    }

    pub fn payment_canceled_calls(&self) -> Vec<Payment> {
        lock(&self.payment_canceled_calls).clone()
    }

    pub fn validate_request_calls(&self) -> Vec<PaymentRequest> {
        lock(&self.validate_request_calls).clone()
    }

    pub fn call_counts(&self) -> HashMap<&'static str, usize> {
        HashMap::from([
            ("handle_payment_created", lock(&self.payment_created_calls).len()),
            ("handle_payment_success", lock(&self.payment_success_calls).len()),
            ("handle_payment_failed", lock(&self.payment_failed_calls).len()),
            ("handle_payment_canceled", lock(&self.payment_canceled_calls).len()),
            ("validate_request", lock(&self.validate_request_calls).len()),
        ])
    }

    /// Clears recorded calls and the configured validation error. The
    /// attached generator survives; existing consumer tests rely on that.
    pub fn reset(&self) {
        lock(&self.payment_created_calls).clear();
        lock(&self.payment_success_calls).clear();
        lock(&self.payment_failed_calls).clear();
        lock(&self.payment_canceled_calls).clear();
        lock(&self.validate_request_calls).clear();
        *lock(&self.validate_request_error) = None;
    }
}

impl ClientHandler for MockClientHandler {
    fn handle_payment_created(&self, payment: &Payment) -> Result<()> {
        lock(&self.payment_created_calls).push(payment.clone());
        Ok(())
    }

    fn handle_payment_success(&self, payment: &Payment) -> Result<()> {
        lock(&self.payment_success_calls).push(payment.clone());
        Ok(())
    }

    fn handle_payment_failed(&self, payment: &Payment) -> Result<()> {
        lock(&self.payment_failed_calls).push(payment.clone());
        Ok(())
    }

    fn handle_payment_canceled(&self, payment: &Payment) -> Result<()> {
        lock(&self.payment_canceled_calls).push(payment.clone());
        Ok(())
    }

    fn validate_request(&self, req: &PaymentRequest) -> Result<()> {
        lock(&self.validate_request_calls).push(req.clone());
        match lock(&self.validate_request_error).as_ref() {
            Some(message) => Err(SdkError::ValidationError(message.clone())),
            None => Ok(()),
        }
    }

    fn merchant_config(&self) -> Option<Arc<MerchantConfig>> {
        lock(&self.merchant).clone()
    }

    fn merchant_id(&self) -> String {
        lock(&self.merchant)
            .as_ref()
            .map(|m| m.gateway.merchant_id.clone())
            .unwrap_or_default()
    }

    fn merchant_name(&self) -> String {
        lock(&self.merchant)
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default()
    }

    fn payment_link_generator(&self) -> Option<Arc<dyn PaymentLinkGenerator>> {
        lock(&self.generator).clone()
    }

    fn set_payment_link_generator(&self, generator: Arc<dyn PaymentLinkGenerator>) {
        *lock(&self.generator) = Some(generator);
    }
}

/// Mock `PaymentLinkGenerator` with configurable canned outputs.
pub struct MockPaymentGenerator {
    generate_calls: Mutex<Vec<PaymentRequest>>,
    validate_price_calls: Mutex<Vec<PaymentRequest>>,
    settings_calls: Mutex<usize>,
    customize_calls: Mutex<Vec<serde_json::Map<String, serde_json::Value>>>,

    generate_result: Mutex<Option<PaymentGenerationResult>>,
    generate_error: Mutex<Option<String>>,
    validate_price_error: Mutex<Option<String>>,
    settings: Mutex<PaymentSettings>,
    customize_error: Mutex<Option<String>>,
}

impl Default for MockPaymentGenerator {
    fn default() -> Self {
        Self {
            generate_calls: Mutex::new(Vec::new()),
            validate_price_calls: Mutex::new(Vec::new()),
            settings_calls: Mutex::new(0),
            customize_calls: Mutex::new(Vec::new()),
            generate_result: Mutex::new(None),
            generate_error: Mutex::new(None),
            validate_price_error: Mutex::new(None),
            settings: Mutex::new(PaymentSettings {
                currency: "RUB".to_string(),
                sandbox_mode: true,
                auto_confirm_timeout: 30,
                custom_fields: serde_json::Map::new(),
            }),
            customize_error: Mutex::new(None),
        }
    }
}

impl MockPaymentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_generate_result(&self, result: PaymentGenerationResult) {
        *lock(&self.generate_result) = Some(result);
    }

    pub fn set_generate_error(&self, message: impl Into<String>) {
        *lock(&self.generate_error) = Some(message.into());
    }

    pub fn set_validate_price_error(&self, message: impl Into<String>) {
        *lock(&self.validate_price_error) = Some(message.into());
    }

    pub fn set_payment_settings(&self, settings: PaymentSettings) {
        *lock(&self.settings) = settings;
    }

    pub fn set_customize_error(&self, message: impl Into<String>) {
        *lock(&self.customize_error) = Some(message.into());
    }

    pub fn generate_calls(&self) -> Vec<PaymentRequest> {
        lock(&self.generate_calls).clone()
    }

    pub fn validate_price_calls(&self) -> Vec<PaymentRequest> {
        lock(&self.validate_price_calls).clone()
    }

    pub fn customize_calls(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        lock(&self.customize_calls).clone()
    }

    pub fn call_counts(&self) -> HashMap<&'static str, usize> {
        HashMap::from([
            ("generate_payment_data", lock(&self.generate_calls).len()),
            ("validate_price_from_backend", lock(&self.validate_price_calls).len()),
            ("payment_settings", *lock(&self.settings_calls)),
            ("customize_gateway_payload", lock(&self.customize_calls).len()),
        ])
    }

    /// Clears recorded calls and configured errors. Non-error canned
    /// outputs (the generation result and settings) remain until
    /// explicitly overwritten.
    pub fn reset(&self) {
        lock(&self.generate_calls).clear();
        lock(&self.validate_price_calls).clear();
        *lock(&self.settings_calls) = 0;
        lock(&self.customize_calls).clear();
        *lock(&self.generate_error) = None;
        *lock(&self.validate_price_error) = None;
        *lock(&self.customize_error) = None;
    }
}

impl PaymentLinkGenerator for MockPaymentGenerator {
    fn generate_payment_data(&self, req: &PaymentRequest) -> Result<PaymentGenerationResult> {
        lock(&self.generate_calls).push(req.clone());
        if let Some(message) = lock(&self.generate_error).as_ref() {
            return Err(SdkError::ValidationError(message.clone()));
        }
        match lock(&self.generate_result).as_ref() {
            Some(result) => Ok(result.clone()),
            // No canned result configured: echo the request.
            None => Ok(PaymentGenerationResult {
                payment_data: serde_json::Map::new(),
                order_id: crate::domain::payment::new_order_id(req.amount),
                amount: req.amount,
                currency: req.currency.clone(),
                description: req.description.clone(),
                return_url: req.return_url.clone(),
                metadata: req.metadata.clone(),
            }),
        }
    }

    fn validate_price_from_backend(&self, req: &PaymentRequest) -> Result<()> {
        lock(&self.validate_price_calls).push(req.clone());
        match lock(&self.validate_price_error).as_ref() {
            Some(message) => Err(SdkError::ValidationError(message.clone())),
            None => Ok(()),
        }
    }

    fn payment_settings(&self) -> PaymentSettings {
        *lock(&self.settings_calls) += 1;
        lock(&self.settings).clone()
    }

    fn customize_gateway_payload(
        &self,
        payload: &mut serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        lock(&self.customize_calls).push(payload.clone());
        match lock(&self.customize_error).as_ref() {
            Some(message) => Err(SdkError::ValidationError(message.clone())),
            None => Ok(()),
        }
    }
}

/// Synthetic merchant configuration used when no config file is supplied.
pub fn sample_merchant() -> MerchantConfig {
    MerchantConfig {
        id: "test-merchant-id".to_string(),
        name: "Test Merchant".to_string(),
        description: "Test merchant for unit testing".to_string(),
        domain: "test.example.com".to_string(),
        enabled: true,
        sandbox_mode: true,
        security: SecurityPolicy {
            enforcement: Default::default(),
            rate_limit: 100,
            allowed_origins: vec!["https://test.example.com".to_string()],
        },
        gateway: GatewayConfig {
            merchant_id: "test-merchant-id".to_string(),
            secret_key: "test-secret-key".to_string(),
            sandbox_mode: true,
            currency: "RUB".to_string(),
            api_base_url: None,
            orders_endpoint: None,
        },
        notifications: Default::default(),
        field_labels: HashMap::from([
            ("order_id".to_string(), "Order ID".to_string()),
            ("amount".to_string(), "Amount".to_string()),
        ]),
        metadata: HashMap::from([(
            "version".to_string(),
            serde_json::Value::String("1.0.0".to_string()),
        )]),
    }
}

/// Synthetic payment in the `created` state.
pub fn sample_payment() -> Payment {
    let now = Utc::now();
    Payment {
        id: "test-payment-id".to_string(),
        order_id: "order_1700000000_1000".to_string(),
        amount: 1000,
        currency: "RUB".to_string(),
        description: "Test payment".to_string(),
        status: PaymentStatus::Created,
        return_url: "https://test.example.com/return".to_string(),
        payment_url: None,
        metadata: HashMap::from([("test".to_string(), serde_json::Value::Bool(true))]),
        created_at: now,
        updated_at: now,
    }
}

/// Synthetic known-good payment request.
pub fn sample_request() -> PaymentRequest {
    PaymentRequest {
        amount: 1000,
        currency: "RUB".to_string(),
        description: "Test payment request".to_string(),
        return_url: "https://test.example.com/return".to_string(),
        metadata: HashMap::from([("test".to_string(), serde_json::Value::Bool(true))]),
    }
}

/// Synthetic generation result matching `sample_request`.
pub fn sample_generation_result() -> PaymentGenerationResult {
    let req = sample_request();
    PaymentGenerationResult {
        payment_data: serde_json::Map::new(),
        order_id: "order_1700000000_1000".to_string(),
        amount: req.amount,
        currency: req.currency,
        description: req.description,
        return_url: req.return_url,
        metadata: req.metadata,
    }
}

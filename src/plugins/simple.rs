//! Reference merchant plugin.
//!
//! Implements both capability sets with the reference behavior the harness
//! and conformance tests are written against. Also serves as the template
//! for plugin authors: a dynamically loaded plugin exports the same two
//! factories via `export_plugin!`.

use crate::domain::merchant::MerchantConfig;
use crate::domain::payment::{
    display_amount, new_order_id, validate_payment_request, Payment, PaymentGenerationResult,
    PaymentRequest, PaymentSettings,
};
use crate::domain::ports::{
    ClientHandler, ClientHandlerBox, PaymentLinkGenerator, PaymentLinkGeneratorBox,
};
use crate::error::Result;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub const PLUGIN_NAME: &str = "simple";

/// Factory matching the `NewHandler` shape.
pub fn new_handler(merchant: Arc<MerchantConfig>) -> ClientHandlerBox {
    info!(
        merchant_id = merchant.gateway.merchant_id.as_str(),
        name = merchant.name.as_str(),
        "simple plugin handler created"
    );
    Box::new(SimpleHandler {
        merchant,
        generator: Mutex::new(None),
    })
}

/// Factory matching the `NewPaymentGenerator` shape.
pub fn new_generator(merchant: Arc<MerchantConfig>) -> PaymentLinkGeneratorBox {
    Box::new(SimpleGenerator { merchant })
}

pub struct SimpleHandler {
    merchant: Arc<MerchantConfig>,
    generator: Mutex<Option<Arc<dyn PaymentLinkGenerator>>>,
}

impl ClientHandler for SimpleHandler {
    fn handle_payment_created(&self, payment: &Payment) -> Result<()> {
        info!(
            payment_id = payment.id.as_str(),
            order_id = payment.order_id.as_str(),
            amount = payment.amount,
            currency = payment.currency.as_str(),
            "payment created"
        );
        Ok(())
    }

    fn handle_payment_success(&self, payment: &Payment) -> Result<()> {
        info!(
            payment_id = payment.id.as_str(),
            order_id = payment.order_id.as_str(),
            amount = payment.amount,
            "payment successful"
        );
        Ok(())
    }

    fn handle_payment_failed(&self, payment: &Payment) -> Result<()> {
        warn!(
            payment_id = payment.id.as_str(),
            order_id = payment.order_id.as_str(),
            amount = payment.amount,
            "payment failed"
        );
        Ok(())
    }

    fn handle_payment_canceled(&self, payment: &Payment) -> Result<()> {
        info!(
            payment_id = payment.id.as_str(),
            order_id = payment.order_id.as_str(),
            amount = payment.amount,
            "payment canceled"
        );
        Ok(())
    }

    fn validate_request(&self, req: &PaymentRequest) -> Result<()> {
        validate_payment_request(req)?;
        debug!(
            amount = req.amount,
            currency = req.currency.as_str(),
            "payment request validated"
        );
        Ok(())
    }

    fn merchant_config(&self) -> Option<Arc<MerchantConfig>> {
        Some(self.merchant.clone())
    }

    fn merchant_id(&self) -> String {
        self.merchant.gateway.merchant_id.clone()
    }

    fn merchant_name(&self) -> String {
        self.merchant.name.clone()
    }

    fn payment_link_generator(&self) -> Option<Arc<dyn PaymentLinkGenerator>> {
        self.generator.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_payment_link_generator(&self, generator: Arc<dyn PaymentLinkGenerator>) {
        *self.generator.lock().unwrap_or_else(|e| e.into_inner()) = Some(generator);
    }
}

pub struct SimpleGenerator {
    merchant: Arc<MerchantConfig>,
}

impl PaymentLinkGenerator for SimpleGenerator {
    fn generate_payment_data(&self, req: &PaymentRequest) -> Result<PaymentGenerationResult> {
        validate_payment_request(req)?;
        let order_id = new_order_id(req.amount);

        let mut payment_data = serde_json::Map::new();
        payment_data.insert(
            "amount".to_string(),
            json!({
                "value": display_amount(req.amount),
                "currency": req.currency,
            }),
        );
        payment_data.insert(
            "confirmation".to_string(),
            json!({
                "type": "redirect",
                "return_url": req.return_url,
            }),
        );
        payment_data.insert("description".to_string(), Value::String(req.description.clone()));
        payment_data.insert(
            "metadata".to_string(),
            serde_json::to_value(&req.metadata).unwrap_or(Value::Null),
        );

        debug!(order_id = order_id.as_str(), amount = req.amount, "payment data generated");

        Ok(PaymentGenerationResult {
            payment_data,
            order_id,
            amount: req.amount,
            currency: req.currency.clone(),
            description: req.description.clone(),
            return_url: req.return_url.clone(),
            metadata: req.metadata.clone(),
        })
    }

    fn validate_price_from_backend(&self, req: &PaymentRequest) -> Result<()> {
        // The reference generator trusts the submitted price; a real plugin
        // would check its own backend here.
        debug!(amount = req.amount, "price validation skipped");
        Ok(())
    }

    fn payment_settings(&self) -> PaymentSettings {
        let mut custom_fields = serde_json::Map::new();
        custom_fields.insert(
            "merchant_name".to_string(),
            Value::String(self.merchant.name.clone()),
        );
        custom_fields.insert(
            "domain".to_string(),
            Value::String(self.merchant.domain.clone()),
        );
        PaymentSettings {
            currency: self.merchant.gateway.currency.clone(),
            sandbox_mode: self.merchant.gateway.sandbox_mode,
            auto_confirm_timeout: 30,
            custom_fields,
        }
    }

    fn customize_gateway_payload(
        &self,
        payload: &mut serde_json::Map<String, Value>,
    ) -> Result<()> {
        payload.insert(
            "merchant_name".to_string(),
            Value::String(self.merchant.name.clone()),
        );
        payload.insert(
            "domain".to_string(),
            Value::String(self.merchant.domain.clone()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_merchant, sample_request};

    fn generator() -> SimpleGenerator {
        SimpleGenerator {
            merchant: Arc::new(sample_merchant()),
        }
    }

    #[test]
    fn test_handler_accessors() {
        let merchant = Arc::new(sample_merchant());
        let handler = new_handler(merchant.clone());

        assert_eq!(handler.merchant_id(), merchant.gateway.merchant_id);
        assert_eq!(handler.merchant_name(), merchant.name);
        assert!(handler.merchant_config().is_some());
        assert!(handler.payment_link_generator().is_none());
    }

    #[test]
    fn test_generator_slot_roundtrip() {
        let merchant = Arc::new(sample_merchant());
        let handler = new_handler(merchant.clone());

        let generator: Arc<dyn PaymentLinkGenerator> = Arc::from(new_generator(merchant));
        handler.set_payment_link_generator(generator);
        assert!(handler.payment_link_generator().is_some());
    }

    #[test]
    fn test_generate_echoes_request_fields() {
        let req = sample_request();
        let result = generator().generate_payment_data(&req).unwrap();

        assert_eq!(result.amount, req.amount);
        assert_eq!(result.currency, req.currency);
        assert_eq!(result.description, req.description);
        assert_eq!(result.return_url, req.return_url);

        let parts: Vec<&str> = result.order_id.split('_').collect();
        assert_eq!(parts[0], "order");
        assert_eq!(parts[2], req.amount.to_string());
    }

    #[test]
    fn test_generate_payment_data_display_value() {
        let req = PaymentRequest {
            amount: 1050,
            ..sample_request()
        };
        let result = generator().generate_payment_data(&req).unwrap();
        let value = result.payment_data["amount"]["value"].as_str().unwrap();
        assert_eq!(value, "10.50");
    }

    #[test]
    fn test_generate_rejects_unvalidated_request() {
        let req = PaymentRequest {
            amount: 0,
            ..sample_request()
        };
        assert!(generator().generate_payment_data(&req).is_err());
    }

    #[test]
    fn test_customize_payload_preserves_existing_keys() {
        let mut payload = serde_json::Map::new();
        payload.insert("description".to_string(), Value::String("keep me".into()));
        payload.insert("amount".to_string(), json!({"value": "10.00"}));

        generator().customize_gateway_payload(&mut payload).unwrap();

        assert_eq!(payload["description"], Value::String("keep me".into()));
        assert_eq!(payload["amount"], json!({"value": "10.00"}));
        assert_eq!(
            payload["merchant_name"],
            Value::String(sample_merchant().name)
        );
        assert!(payload.contains_key("domain"));
    }

    #[test]
    fn test_customize_payload_on_empty_payload() {
        let mut payload = serde_json::Map::new();
        generator().customize_gateway_payload(&mut payload).unwrap();
        assert!(payload.contains_key("merchant_name"));
        assert!(payload.contains_key("domain"));
    }

    #[test]
    fn test_settings_are_fresh_snapshots() {
        let generator = generator();
        let first = generator.payment_settings();
        let second = generator.payment_settings();
        assert_eq!(first, second);
        assert_eq!(first.auto_confirm_timeout, 30);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Merchant configuration handed to a plugin at construction time.
///
/// The host owns the configuration and shares it with the plugin as an
/// `Arc<MerchantConfig>` for the lifetime of the handler instance. Plugins
/// must treat it as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub domain: String,
    pub enabled: bool,
    #[serde(default)]
    pub sandbox_mode: bool,
    #[serde(default)]
    pub security: SecurityPolicy,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Labels for order metadata fields in notifications.
    #[serde(default)]
    pub field_labels: HashMap<String, String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Request enforcement policy applied by the host in front of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementMode {
    /// Reject anything that fails origin or rate checks.
    Strict,
    /// Enforce origin checks only.
    Origin,
    /// Log violations without rejecting.
    #[default]
    Monitor,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityPolicy {
    #[serde(default)]
    pub enforcement: EnforcementMode,
    #[serde(default)]
    pub rate_limit: u32,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Payment gateway credentials and endpoint overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub merchant_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub sandbox_mode: bool,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders_endpoint: Option<String>,
}

/// Notification policy. The shape is part of the merchant configuration
/// contract; delivery itself is out of scope for this crate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default)]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub from: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization_minimal() {
        let json = r#"{
            "id": "acme",
            "name": "Acme Store",
            "domain": "acme.example.com",
            "enabled": true,
            "gateway": { "merchant_id": "acme-gw-1" }
        }"#;
        let config: MerchantConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.id, "acme");
        assert_eq!(config.gateway.merchant_id, "acme-gw-1");
        assert_eq!(config.security.enforcement, EnforcementMode::Monitor);
        assert!(!config.notifications.telegram.enabled);
    }

    #[test]
    fn test_enforcement_mode_lowercase() {
        let json = r#"{"enforcement": "strict", "rate_limit": 10, "allowed_origins": []}"#;
        let policy: SecurityPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.enforcement, EnforcementMode::Strict);
    }
}

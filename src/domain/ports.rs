use super::merchant::MerchantConfig;
use super::payment::{Payment, PaymentGenerationResult, PaymentRequest, PaymentSettings};
use crate::error::Result;
use std::sync::Arc;

/// The capability set every merchant plugin handler must implement.
///
/// Lifecycle callbacks are ordinary blocking calls; the host invokes them
/// sequentially and never concurrently against the same instance.
pub trait ClientHandler: Send + Sync {
    fn handle_payment_created(&self, payment: &Payment) -> Result<()>;
    fn handle_payment_success(&self, payment: &Payment) -> Result<()>;
    fn handle_payment_failed(&self, payment: &Payment) -> Result<()>;
    fn handle_payment_canceled(&self, payment: &Payment) -> Result<()>;

    /// Validates an incoming request against the merchant's business rules.
    fn validate_request(&self, req: &PaymentRequest) -> Result<()>;

    /// The configuration this handler was constructed with, if wired.
    fn merchant_config(&self) -> Option<Arc<MerchantConfig>>;
    fn merchant_id(&self) -> String;
    fn merchant_name(&self) -> String;

    /// Optional payment link generator slot.
    ///
    /// The slot is typed: only a real generator capability can be attached,
    /// so host/plugin version skew cannot smuggle in an arbitrary value.
    fn payment_link_generator(&self) -> Option<Arc<dyn PaymentLinkGenerator>>;
    fn set_payment_link_generator(&self, generator: Arc<dyn PaymentLinkGenerator>);
}

/// The capability set for payment link generation.
pub trait PaymentLinkGenerator: Send + Sync {
    fn generate_payment_data(&self, req: &PaymentRequest) -> Result<PaymentGenerationResult>;

    /// Verifies the requested price against the merchant's own backend.
    fn validate_price_from_backend(&self, req: &PaymentRequest) -> Result<()>;

    /// Returns a fresh settings snapshot for each call.
    fn payment_settings(&self) -> PaymentSettings;

    /// Mutates a gateway payload in place, adding merchant-identifying
    /// fields. Pre-existing keys must be preserved.
    fn customize_gateway_payload(
        &self,
        payload: &mut serde_json::Map<String, serde_json::Value>,
    ) -> Result<()>;
}

pub type ClientHandlerBox = Box<dyn ClientHandler>;
pub type PaymentLinkGeneratorBox = Box<dyn PaymentLinkGenerator>;

/// The exact function shape a plugin's `NewHandler` symbol must match.
pub type HandlerFactory = fn(Arc<MerchantConfig>) -> ClientHandlerBox;

/// The exact function shape a plugin's `NewPaymentGenerator` symbol must match.
pub type GeneratorFactory = fn(Arc<MerchantConfig>) -> PaymentLinkGeneratorBox;

/// ABI version stamped into every entry point. Bumped on any change to the
/// contract types or factory shapes.
pub const PLUGIN_ABI_VERSION: u32 = 1;

/// Symbol name of the required handler factory.
pub const NEW_HANDLER_SYMBOL: &str = "NewHandler";

/// Symbol name of the optional generator factory.
pub const NEW_GENERATOR_SYMBOL: &str = "NewPaymentGenerator";

/// Signature tag the host expects on `NewHandler`.
pub const HANDLER_FACTORY_SIGNATURE: &str =
    "fn(Arc<MerchantConfig>) -> Box<dyn ClientHandler>";

/// Signature tag the host expects on `NewPaymentGenerator`.
pub const GENERATOR_FACTORY_SIGNATURE: &str =
    "fn(Arc<MerchantConfig>) -> Box<dyn PaymentLinkGenerator>";

/// A factory exported by a plugin under a well-known symbol name.
#[derive(Debug, Clone, Copy)]
pub enum ExportedFactory {
    Handler(HandlerFactory),
    Generator(GeneratorFactory),
}

impl ExportedFactory {
    /// Human-readable shape of the exported symbol, for mismatch reports.
    pub fn shape(&self) -> &'static str {
        match self {
            ExportedFactory::Handler(_) => HANDLER_FACTORY_SIGNATURE,
            ExportedFactory::Generator(_) => GENERATOR_FACTORY_SIGNATURE,
        }
    }
}

/// One exported symbol of a plugin module: the factory itself plus the
/// ABI/signature metadata the verifier checks before any invocation.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoint {
    pub abi_version: u32,
    pub signature: &'static str,
    pub factory: ExportedFactory,
}

impl EntryPoint {
    pub fn handler(factory: HandlerFactory) -> Self {
        Self {
            abi_version: PLUGIN_ABI_VERSION,
            signature: HANDLER_FACTORY_SIGNATURE,
            factory: ExportedFactory::Handler(factory),
        }
    }

    pub fn generator(factory: GeneratorFactory) -> Self {
        Self {
            abi_version: PLUGIN_ABI_VERSION,
            signature: GENERATOR_FACTORY_SIGNATURE,
            factory: ExportedFactory::Generator(factory),
        }
    }
}

/// An opened plugin module whose exported symbols can be looked up by name.
pub trait PluginModule {
    fn name(&self) -> &str;
    fn lookup(&self, symbol: &str) -> Option<&EntryPoint>;
}

impl std::fmt::Debug for dyn PluginModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginModule")
            .field("name", &self.name())
            .finish()
    }
}

/// Loading strategy port: resolves a plugin name to an opened module.
///
/// Loading must be idempotent and side-effect-free on the filesystem so
/// that concurrent harness runs can each perform their own load.
pub trait PluginLoader {
    fn load(&self, name: &str) -> Result<Box<dyn PluginModule>>;
}

/// Declaration a dynamically loaded plugin exports under the
/// `PLUGIN_DECLARATION` symbol. Use [`export_plugin!`](crate::export_plugin)
/// rather than writing this by hand.
pub struct PluginDeclaration {
    pub abi_version: u32,
    pub new_handler: EntryPoint,
    pub new_payment_generator: Option<EntryPoint>,
}

/// Exports a plugin's entry points from a `cdylib` crate.
///
/// ```ignore
/// paylink::export_plugin!(new_handler, new_payment_generator);
/// paylink::export_plugin!(new_handler);
/// ```
#[macro_export]
macro_rules! export_plugin {
    ($handler:path) => {
        #[unsafe(no_mangle)]
        pub static PLUGIN_DECLARATION: $crate::domain::ports::PluginDeclaration =
            $crate::domain::ports::PluginDeclaration {
                abi_version: $crate::domain::ports::PLUGIN_ABI_VERSION,
                new_handler: $crate::domain::ports::EntryPoint {
                    abi_version: $crate::domain::ports::PLUGIN_ABI_VERSION,
                    signature: $crate::domain::ports::HANDLER_FACTORY_SIGNATURE,
                    factory: $crate::domain::ports::ExportedFactory::Handler($handler),
                },
                new_payment_generator: None,
            };
    };
    ($handler:path, $generator:path) => {
        #[unsafe(no_mangle)]
        pub static PLUGIN_DECLARATION: $crate::domain::ports::PluginDeclaration =
            $crate::domain::ports::PluginDeclaration {
                abi_version: $crate::domain::ports::PLUGIN_ABI_VERSION,
                new_handler: $crate::domain::ports::EntryPoint {
                    abi_version: $crate::domain::ports::PLUGIN_ABI_VERSION,
                    signature: $crate::domain::ports::HANDLER_FACTORY_SIGNATURE,
                    factory: $crate::domain::ports::ExportedFactory::Handler($handler),
                },
                new_payment_generator: Some($crate::domain::ports::EntryPoint {
                    abi_version: $crate::domain::ports::PLUGIN_ABI_VERSION,
                    signature: $crate::domain::ports::GENERATOR_FACTORY_SIGNATURE,
                    factory: $crate::domain::ports::ExportedFactory::Generator($generator),
                }),
            };
    };
}

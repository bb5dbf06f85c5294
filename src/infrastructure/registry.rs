use crate::domain::ports::{
    EntryPoint, PluginLoader, PluginModule, NEW_GENERATOR_SYMBOL, NEW_HANDLER_SYMBOL,
};
use crate::error::{Result, SdkError};
use crate::plugins::simple;
use std::collections::HashMap;
use tracing::debug;

/// A compiled-in plugin module: a named table of exported entry points.
#[derive(Clone)]
pub struct RegisteredModule {
    name: String,
    exports: HashMap<&'static str, EntryPoint>,
}

impl RegisteredModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: HashMap::new(),
        }
    }

    /// Adds an exported symbol to the module.
    pub fn export(mut self, symbol: &'static str, entry: EntryPoint) -> Self {
        self.exports.insert(symbol, entry);
        self
    }
}

impl PluginModule for RegisteredModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, symbol: &str) -> Option<&EntryPoint> {
        self.exports.get(symbol)
    }
}

/// Static-link loading strategy: plugins registered at build time, keyed by
/// name. Each instance owns its own table; there is no process-wide
/// registry.
#[derive(Default)]
pub struct StaticRegistry {
    modules: HashMap<String, RegisteredModule>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in reference plugin.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            RegisteredModule::new(simple::PLUGIN_NAME)
                .export(NEW_HANDLER_SYMBOL, EntryPoint::handler(simple::new_handler))
                .export(
                    NEW_GENERATOR_SYMBOL,
                    EntryPoint::generator(simple::new_generator),
                ),
        );
        registry
    }

    pub fn register(&mut self, module: RegisteredModule) {
        debug!(plugin = module.name.as_str(), "registered plugin module");
        self.modules.insert(module.name.clone(), module);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl PluginLoader for StaticRegistry {
    fn load(&self, name: &str) -> Result<Box<dyn PluginModule>> {
        let module = self
            .modules
            .get(name)
            .ok_or_else(|| SdkError::NotFound(name.to_string()))?;
        Ok(Box::new(module.clone()))
    }
}

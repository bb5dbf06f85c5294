use crate::domain::ports::{
    ExportedFactory, GeneratorFactory, HandlerFactory, PluginModule, EntryPoint,
    GENERATOR_FACTORY_SIGNATURE, HANDLER_FACTORY_SIGNATURE, NEW_GENERATOR_SYMBOL,
    NEW_HANDLER_SYMBOL, PLUGIN_ABI_VERSION,
};
use crate::error::{Result, SdkError};
use tracing::debug;

/// Resolves the required `NewHandler` entry point.
///
/// This is the safety boundary for untrusted artifacts: the symbol must
/// match the host's ABI version and exact factory shape, and nothing from
/// the plugin is invoked until it does. A missing symbol fails with
/// `MissingEntryPoint`; any shape deviation fails with `SignatureMismatch`.
pub fn resolve_handler_factory(module: &dyn PluginModule) -> Result<HandlerFactory> {
    let entry = module
        .lookup(NEW_HANDLER_SYMBOL)
        .ok_or_else(|| SdkError::MissingEntryPoint(NEW_HANDLER_SYMBOL.to_string()))?;

    check_shape(NEW_HANDLER_SYMBOL, HANDLER_FACTORY_SIGNATURE, entry)?;
    match entry.factory {
        ExportedFactory::Handler(factory) => {
            debug!(plugin = module.name(), "resolved handler factory");
            Ok(factory)
        }
        ExportedFactory::Generator(_) => Err(mismatch(
            NEW_HANDLER_SYMBOL,
            HANDLER_FACTORY_SIGNATURE,
            entry.factory.shape(),
        )),
    }
}

/// Resolves the optional `NewPaymentGenerator` entry point.
///
/// An absent symbol is not an error; a present symbol with the wrong shape
/// is, for the same reason as the handler factory.
pub fn resolve_generator_factory(module: &dyn PluginModule) -> Result<Option<GeneratorFactory>> {
    let Some(entry) = module.lookup(NEW_GENERATOR_SYMBOL) else {
        return Ok(None);
    };

    check_shape(NEW_GENERATOR_SYMBOL, GENERATOR_FACTORY_SIGNATURE, entry)?;
    match entry.factory {
        ExportedFactory::Generator(factory) => {
            debug!(plugin = module.name(), "resolved generator factory");
            Ok(Some(factory))
        }
        ExportedFactory::Handler(_) => Err(mismatch(
            NEW_GENERATOR_SYMBOL,
            GENERATOR_FACTORY_SIGNATURE,
            entry.factory.shape(),
        )),
    }
}

fn check_shape(symbol: &str, expected: &str, entry: &EntryPoint) -> Result<()> {
    if entry.abi_version != PLUGIN_ABI_VERSION {
        return Err(mismatch(
            symbol,
            &format!("{expected} [abi v{PLUGIN_ABI_VERSION}]"),
            &format!("{} [abi v{}]", entry.signature, entry.abi_version),
        ));
    }
    if entry.signature != expected {
        return Err(mismatch(symbol, expected, entry.signature));
    }
    Ok(())
}

fn mismatch(symbol: &str, expected: &str, found: &str) -> SdkError {
    SdkError::SignatureMismatch {
        symbol: symbol.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::EntryPoint;
    use crate::infrastructure::registry::RegisteredModule;
    use crate::plugins::simple;

    #[test]
    fn test_missing_handler_symbol() {
        let module = RegisteredModule::new("empty");
        let err = resolve_handler_factory(&module).unwrap_err();
        assert!(matches!(err, SdkError::MissingEntryPoint(ref s) if s == "NewHandler"));
    }

    #[test]
    fn test_wrong_factory_kind_is_rejected() {
        // A generator factory exported under the handler symbol must fail
        // before anything from the plugin runs.
        let module = RegisteredModule::new("rogue")
            .export(NEW_HANDLER_SYMBOL, EntryPoint::generator(simple::new_generator));
        let err = resolve_handler_factory(&module).unwrap_err();
        assert!(matches!(err, SdkError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_stale_abi_version_is_rejected() {
        let mut entry = EntryPoint::handler(simple::new_handler);
        entry.abi_version = 0;
        let module = RegisteredModule::new("stale").export(NEW_HANDLER_SYMBOL, entry);
        let err = resolve_handler_factory(&module).unwrap_err();
        assert!(matches!(err, SdkError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_generator_is_optional() {
        let module =
            RegisteredModule::new("nogen").export(NEW_HANDLER_SYMBOL, EntryPoint::handler(simple::new_handler));
        assert!(resolve_generator_factory(&module).unwrap().is_none());
    }

    #[test]
    fn test_well_formed_module_resolves() {
        let module = RegisteredModule::new("simple")
            .export(NEW_HANDLER_SYMBOL, EntryPoint::handler(simple::new_handler))
            .export(
                NEW_GENERATOR_SYMBOL,
                EntryPoint::generator(simple::new_generator),
            );

        assert!(resolve_handler_factory(&module).is_ok());
        assert!(resolve_generator_factory(&module).unwrap().is_some());
    }
}

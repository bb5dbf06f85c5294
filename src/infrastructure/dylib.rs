use crate::domain::ports::{PluginLoader, PluginModule};
use crate::error::{Result, SdkError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Native dynamic-library loading strategy.
///
/// Resolves a plugin artifact from the conventional directory layout:
/// `{root}/{name}/{name}.<ext>` first, falling back to `{root}/{name}.<ext>`
/// for legacy flat layouts. The extension is the platform's dynamic-library
/// extension (`so`, `dylib`, `dll`).
///
/// Opening the resolved artifact requires the `dynamic-loading` feature;
/// path resolution works either way. Once opened, a library stays mapped
/// for the life of the process — there is no unload.
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the artifact path for `name`, or `NotFound` if neither
    /// layout has it.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let ext = std::env::consts::DLL_EXTENSION;
        let nested = self.root.join(name).join(format!("{name}.{ext}"));
        if nested.is_file() {
            return Ok(nested);
        }
        let flat = self.root.join(format!("{name}.{ext}"));
        if flat.is_file() {
            return Ok(flat);
        }
        Err(SdkError::NotFound(name.to_string()))
    }
}

impl PluginLoader for DirectoryLoader {
    fn load(&self, name: &str) -> Result<Box<dyn PluginModule>> {
        let path = self.resolve(name)?;
        info!(plugin = name, path = %path.display(), "loading plugin");
        open_library(name, &path)
    }
}

#[cfg(feature = "dynamic-loading")]
fn open_library(name: &str, path: &Path) -> Result<Box<dyn PluginModule>> {
    use crate::domain::ports::{
        EntryPoint, PluginDeclaration, NEW_GENERATOR_SYMBOL, NEW_HANDLER_SYMBOL,
    };

    // SAFETY: the artifact is untrusted by policy, but nothing from it is
    // executed here; only the declaration static is read. Execution is
    // deferred until the verifier has accepted the entry-point shapes.
    let library = unsafe { libloading::Library::new(path) }.map_err(|err| SdkError::LoadError {
        name: name.to_string(),
        reason: err.to_string(),
    })?;

    // The module is a process-wide resource; keep it mapped forever.
    let library: &'static libloading::Library = Box::leak(Box::new(library));

    let declaration: &'static PluginDeclaration = unsafe {
        library
            .get::<*const PluginDeclaration>(b"PLUGIN_DECLARATION")
            .map_err(|_| SdkError::MissingEntryPoint("PLUGIN_DECLARATION".to_string()))
            .map(|symbol| &**symbol)?
    };

    let mut exports: Vec<(&'static str, EntryPoint)> =
        vec![(NEW_HANDLER_SYMBOL, declaration.new_handler)];
    if let Some(generator) = declaration.new_payment_generator {
        exports.push((NEW_GENERATOR_SYMBOL, generator));
    }

    Ok(Box::new(DyLibModule {
        name: name.to_string(),
        exports,
    }))
}

#[cfg(not(feature = "dynamic-loading"))]
fn open_library(name: &str, _path: &Path) -> Result<Box<dyn PluginModule>> {
    Err(SdkError::LoadError {
        name: name.to_string(),
        reason: "built without the dynamic-loading feature".to_string(),
    })
}

#[cfg(feature = "dynamic-loading")]
struct DyLibModule {
    name: String,
    exports: Vec<(&'static str, crate::domain::ports::EntryPoint)>,
}

#[cfg(feature = "dynamic-loading")]
impl PluginModule for DyLibModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, symbol: &str) -> Option<&crate::domain::ports::EntryPoint> {
        self.exports
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, entry)| entry)
    }
}

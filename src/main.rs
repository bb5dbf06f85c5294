use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paylink::application::conformance::validate_handler;
use paylink::application::harness::{Harness, TestMode};
use paylink::application::verify::{resolve_generator_factory, resolve_handler_factory};
use paylink::domain::ports::PluginLoader;
use paylink::infrastructure::dylib::DirectoryLoader;
use paylink::infrastructure::registry::StaticRegistry;
use paylink::interfaces::config::load_merchant_config;
use paylink::testing::sample_merchant;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Plugin name (e.g. acme)
    #[arg(short, long)]
    plugin: String,

    /// Plugins directory
    #[arg(long, default_value = "plugins")]
    plugins_dir: PathBuf,

    /// Load from the compiled-in registry instead of the plugins directory
    #[arg(long)]
    builtin: bool,

    /// Path to a merchant config file (JSON or YAML). Falls back to the
    /// built-in synthetic test merchant.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Test mode: validate, simulate, benchmark
    #[arg(short, long)]
    test: Option<String>,

    /// Print per-step pass/fail lines
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let loader: Box<dyn PluginLoader> = if cli.builtin {
        Box::new(StaticRegistry::with_builtin())
    } else {
        Box::new(DirectoryLoader::new(cli.plugins_dir))
    };

    println!("Loading plugin: {}", cli.plugin);
    let module = loader.load(&cli.plugin).into_diagnostic()?;

    let handler_factory = resolve_handler_factory(module.as_ref()).into_diagnostic()?;
    let generator_factory = resolve_generator_factory(module.as_ref()).into_diagnostic()?;

    let merchant = match &cli.config {
        Some(path) => {
            println!("Loading config: {}", path.display());
            Arc::new(load_merchant_config(path).into_diagnostic()?)
        }
        None => {
            println!("Using test merchant configuration");
            Arc::new(sample_merchant())
        }
    };

    println!("Creating handler...");
    let handler = handler_factory(merchant.clone());
    if let Some(factory) = generator_factory {
        handler.set_payment_link_generator(Arc::from(factory(merchant)));
    }

    println!("Validating handler...");
    let report = validate_handler(handler.as_ref());
    if !report.passed() {
        for violation in report.violations() {
            eprintln!("[fail] {violation}");
        }
        report.into_result().into_diagnostic()?;
    }
    println!("[ok] handler validation passed");

    match cli.test.as_deref() {
        Some(name) => match TestMode::parse(name) {
            Some(mode) => Harness::new(cli.verbose).run(mode, handler.as_ref()),
            None => {
                println!("Unknown test mode: {name}");
                println!("Test modes: validate, simulate, benchmark");
            }
        },
        None => {
            println!("No test mode specified. Use --test validate|simulate|benchmark");
        }
    }

    Ok(())
}

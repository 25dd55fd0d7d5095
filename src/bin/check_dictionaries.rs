//! Dictionary check binary - loads every locale's bundle and compares it
//! with the default locale's
//!
//! Usage:
//!   cargo run --bin check-dictionaries              # Fail on errors only
//!   cargo run --bin check-dictionaries -- --strict  # Fail on warnings too
//!
//! Reads the same environment as the server (LOCALES, DEFAULT_LOCALE,
//! DICTIONARY_DIR, DICTIONARY_BASE_URL, ...).

use anyhow::{bail, Context, Result};
use i18n_gateway::{
    config::Config,
    i18n::{DictionaryLoader, DictionaryValidator},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_gateway=warn".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let strict = std::env::args().any(|arg| arg == "--strict");

    let config = Config::from_env()?;
    let registry = Arc::new(
        config
            .build_registry()
            .context("Invalid locale configuration")?,
    );
    let loader = DictionaryLoader::new(registry.clone(), config.bundle_source()?)
        .with_options(config.loader_options());

    info!("Checking dictionaries from {}", loader.source_description());

    let default = registry.default_locale().id();
    let reference = loader
        .load(default)
        .await
        .with_context(|| format!("Default dictionary '{}' must load", default))?;

    println!("\n{}", "=".repeat(60));
    println!(
        "Reference: {} ({} messages)",
        default,
        reference.flatten().len()
    );
    println!("{}\n", "=".repeat(60));

    let mut errors = 0;
    let mut warnings = 0;

    for locale in registry.all().iter().filter(|l| !l.is_default()) {
        let candidate = match loader.load(locale.id()).await {
            Ok(dictionary) => dictionary,
            Err(e) => {
                println!("✗ {} ({}): {}", locale.id(), locale.label(), e);
                errors += 1;
                continue;
            }
        };

        let report = DictionaryValidator::validate(&reference, &candidate);
        let mark = if report.has_errors() {
            "✗"
        } else if report.has_warnings() {
            "!"
        } else {
            "✓"
        };
        println!("{} {} ({})", mark, locale.id(), locale.label());

        for error in &report.errors {
            println!("    error: {}", error);
        }
        for warning in &report.warnings {
            println!("    warning: {}", warning);
        }

        errors += report.errors.len();
        warnings += report.warnings.len();
    }

    println!("\n{} error(s), {} warning(s)", errors, warnings);

    if errors > 0 || (strict && warnings > 0) {
        bail!("Dictionary check failed");
    }
    Ok(())
}

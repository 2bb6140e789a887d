//! Template coverage report - lists which (page, language) pairs have a
//! template, which are served through the default-language fallback, and
//! which end in a 404.
//!
//! Usage:
//!   cargo run --bin template-report
//!
//! Reads the same environment as the server (SITE_VARIANT, LOCALE_TABLE,
//! TEMPLATE_DIR). Exits with an error when any pair is missing.

use anyhow::{bail, Result};
use localized_pages::config::{self, Config};
use localized_pages::i18n::{coverage, CoverageStatus};
use tracing::{info, warn};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter("template_report")?)
        .init();

    let config = Config::from_env()?;
    let table = config.load_locale_table()?;
    table.validate()?;

    info!("Checking templates under {}", config.template_dir.display());
    let report = coverage::check(&table, &config.template_dir);

    for entry in &report.entries {
        match &entry.status {
            CoverageStatus::Present => {
                info!("✓ {:<24} {:<3} {}", entry.page, entry.lang, entry.template)
            }
            CoverageStatus::FallsBack(fallback) => warn!(
                "↩ {:<24} {:<3} {} missing, serving {}",
                entry.page, entry.lang, entry.template, fallback
            ),
            CoverageStatus::Missing => warn!(
                "✗ {:<24} {:<3} {} missing",
                entry.page, entry.lang, entry.template
            ),
        }
    }

    let missing = report.missing().count();
    info!(
        "{} pairs checked, {} via fallback, {} missing",
        report.entries.len(),
        report.fallbacks().count(),
        missing
    );

    if missing > 0 {
        bail!("{} page/language pairs have no template", missing);
    }

    Ok(())
}

use crate::i18n::LocaleTable;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Built-in locale table to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteVariant {
    English,
    French,
}

impl SiteVariant {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(SiteVariant::English),
            "fr" | "french" => Ok(SiteVariant::French),
            other => bail!("Unknown SITE_VARIANT '{}'. Expected 'en' or 'fr'", other),
        }
    }

    pub fn locale_table(self) -> LocaleTable {
        match self {
            SiteVariant::English => LocaleTable::english_default(),
            SiteVariant::French => LocaleTable::french_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locales
    pub site_variant: SiteVariant,
    pub locale_table_file: Option<PathBuf>,

    // Content
    pub template_dir: PathBuf,
    pub site_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: match std::env::var("PORT") {
                Ok(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid PORT '{}'", value))?,
                Err(_) => 5000,
            },

            // Locales
            site_variant: match std::env::var("SITE_VARIANT") {
                Ok(value) => SiteVariant::parse(&value)?,
                Err(_) => SiteVariant::English,
            },
            locale_table_file: std::env::var("LOCALE_TABLE").ok().map(PathBuf::from),

            // Content
            template_dir: std::env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            site_root: std::env::var("SITE_ROOT")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
        })
    }

    /// Load the locale table: the JSON file when configured, otherwise the
    /// built-in preset for the site variant.
    pub fn load_locale_table(&self) -> Result<LocaleTable> {
        match &self.locale_table_file {
            Some(path) => LocaleTable::from_json_file(path)
                .with_context(|| format!("Failed to load locale table {}", path.display())),
            None => Ok(self.site_variant.locale_table()),
        }
    }
}

/// Log filter shared by the binaries: `RUST_LOG` plus `info` for the
/// binary's own target and for `tower_http`, whose request traces would
/// otherwise be filtered out.
pub fn log_filter(crate_target: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive(format!("{}=info", crate_target).parse()?)
        .add_directive("tower_http=info".parse()?))
}

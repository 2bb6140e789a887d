//! Internationalization (i18n) module: languages, the locale table, and
//! template naming.
//!
//! # Architecture
//!
//! - `language`: `LanguageCode` type and the `"en"` naming privilege
//! - `registry`: `LocaleTable`, the single source of truth for what a
//!   deployment supports
//! - `template`: builds template identifiers from base paths
//! - `coverage`: reports which translations exist on disk
//!
//! # Example
//!
//! ```rust,ignore
//! use localized_pages::i18n::{resolve, LanguageCode, LocaleTable};
//!
//! let table = LocaleTable::french_default();
//! let base = table.base_path_for("contact").unwrap();
//! let id = resolve(base, &LanguageCode::new("de")); // pages/contact_de.html
//! ```

pub mod coverage;
mod language;
mod registry;
mod template;

pub use coverage::{CoverageEntry, CoverageReport, CoverageStatus};
pub use language::{LanguageCode, ENGLISH_CODE};
pub use registry::{
    LanguageConfig, LocaleTable, LocaleTableError, PageEntry, PageKind, UnknownSegmentPolicy,
};
pub use template::{resolve, TemplateId};

//! Locale table: the routing configuration of one deployment.
//!
//! A `LocaleTable` holds every piece of data the router decides on: the
//! supported languages, the default language, which logical pages exist and
//! where their templates live, which pages are only available in English, and
//! which pages are exposed without a language prefix. It is loaded once at
//! startup and is read-only thereafter.

use crate::i18n::language::LanguageCode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Metadata for a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Language code (e.g., "en", "fr")
    pub code: LanguageCode,

    /// English name of the language (e.g., "French")
    pub name: String,

    /// Native name of the language (e.g., "Français")
    pub native_name: String,
}

impl LanguageConfig {
    pub fn new(code: &str, name: &str, native_name: &str) -> Self {
        Self {
            code: LanguageCode::new(code),
            name: name.to_string(),
            native_name: native_name.to_string(),
        }
    }
}

/// What kind of content a logical page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Unit-conversion tool page
    Tool,
    /// Blog index or article
    Blog,
    /// Informational page (about, contact, legal)
    Info,
}

/// A logical page and the language-independent part of its template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub name: String,
    pub base_path: String,
    pub kind: PageKind,
}

impl PageEntry {
    pub fn new(name: &str, base_path: &str, kind: PageKind) -> Self {
        Self {
            name: name.to_string(),
            base_path: base_path.to_string(),
            kind,
        }
    }
}

/// What to do with a single path segment that is neither a language code nor
/// a page reachable without a language prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSegmentPolicy {
    /// Redirect to the home page.
    #[default]
    RedirectHome,
    /// Render the segment as an English page; unknown names are 404.
    NotFound,
}

/// Configuration errors detected by [`LocaleTable::validate`] or while loading.
#[derive(Debug, Error)]
pub enum LocaleTableError {
    #[error("no supported languages configured")]
    NoLanguages,

    #[error("default language '{0}' is not in the supported set")]
    DefaultNotSupported(LanguageCode),

    #[error("malformed language code '{0}' (expected 2-3 lowercase letters)")]
    MalformedLanguageCode(String),

    #[error("language '{0}' is listed more than once")]
    DuplicateLanguage(LanguageCode),

    #[error("page '{0}' is listed more than once")]
    DuplicatePage(String),

    #[error("page name '{0}' must be a single non-empty path segment")]
    InvalidPageName(String),

    #[error("{list} page '{page}' has no entry in the page map")]
    UnmappedPage { list: &'static str, page: String },

    #[error("failed to read locale table from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locale table from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The routing configuration of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTable {
    languages: Vec<LanguageConfig>,
    default_language: LanguageCode,
    pages: Vec<PageEntry>,

    /// Pages that only exist in English.
    #[serde(default)]
    untranslated: Vec<String>,

    /// Pages served at `/<page>` and always rendered in English.
    #[serde(default)]
    top_level_routes: Vec<String>,

    #[serde(default)]
    unknown_segment_policy: UnknownSegmentPolicy,
}

static LANGUAGE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

impl LocaleTable {
    /// Create a table with no untranslated pages, no top-level routes and the
    /// default unknown-segment policy. The table is not validated.
    pub fn new(
        languages: Vec<LanguageConfig>,
        default_language: LanguageCode,
        pages: Vec<PageEntry>,
    ) -> Self {
        Self {
            languages,
            default_language,
            pages,
            untranslated: Vec::new(),
            top_level_routes: Vec::new(),
            unknown_segment_policy: UnknownSegmentPolicy::default(),
        }
    }

    /// Set the pages that only exist in English
    pub fn with_untranslated<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.untranslated = pages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pages exposed at the top level and rendered in English
    pub fn with_top_level_routes<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.top_level_routes = pages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the policy for unrecognized single path segments
    pub fn with_unknown_segment_policy(mut self, policy: UnknownSegmentPolicy) -> Self {
        self.unknown_segment_policy = policy;
        self
    }

    /// Preset: English-default deployment.
    ///
    /// Unknown single segments redirect home and tool pages are only
    /// reachable under a language prefix.
    pub fn english_default() -> Self {
        Self::new(site_languages(), LanguageCode::english(), site_pages())
            .with_untranslated(SITE_UNTRANSLATED.iter().copied())
            .with_unknown_segment_policy(UnknownSegmentPolicy::RedirectHome)
    }

    /// Preset: French-default deployment.
    ///
    /// The root serves French, while the converter tools are also exposed at
    /// the top level in English.
    pub fn french_default() -> Self {
        Self::new(site_languages(), LanguageCode::new("fr"), site_pages())
            .with_untranslated(SITE_UNTRANSLATED.iter().copied())
            .with_top_level_routes(["cl-to-g", "g-to-cl"])
            .with_unknown_segment_policy(UnknownSegmentPolicy::NotFound)
    }

    /// Load and validate a table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LocaleTableError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LocaleTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table: LocaleTable =
            serde_json::from_str(&content).map_err(|source| LocaleTableError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        table.validate()?;
        Ok(table)
    }

    /// Check the table for internal consistency.
    pub fn validate(&self) -> Result<(), LocaleTableError> {
        if self.languages.is_empty() {
            return Err(LocaleTableError::NoLanguages);
        }

        let code_regex =
            LANGUAGE_CODE_REGEX.get_or_init(|| Regex::new(r"^[a-z]{2,3}$").unwrap());
        let mut seen_codes = HashSet::new();
        for lang in &self.languages {
            if !code_regex.is_match(lang.code.as_str()) {
                return Err(LocaleTableError::MalformedLanguageCode(
                    lang.code.to_string(),
                ));
            }
            if !seen_codes.insert(lang.code.as_str()) {
                return Err(LocaleTableError::DuplicateLanguage(lang.code.clone()));
            }
        }

        if !self.is_supported(self.default_language.as_str()) {
            return Err(LocaleTableError::DefaultNotSupported(
                self.default_language.clone(),
            ));
        }

        let mut seen_pages = HashSet::new();
        for page in &self.pages {
            if page.name.is_empty() || page.name.contains('/') {
                return Err(LocaleTableError::InvalidPageName(page.name.clone()));
            }
            if !seen_pages.insert(page.name.as_str()) {
                return Err(LocaleTableError::DuplicatePage(page.name.clone()));
            }
        }

        for (list, names) in [
            ("untranslated", &self.untranslated),
            ("top-level", &self.top_level_routes),
        ] {
            if let Some(missing) = names.iter().find(|name| !seen_pages.contains(name.as_str())) {
                return Err(LocaleTableError::UnmappedPage {
                    list,
                    page: missing.clone(),
                });
            }
        }

        Ok(())
    }

    /// Check if a language code is in the supported set.
    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.iter().any(|lang| lang.code == code)
    }

    /// The fallback language, also served at the root path.
    pub fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }

    /// Check if a page only exists in English.
    pub fn is_untranslated(&self, page: &str) -> bool {
        self.untranslated.iter().any(|name| name == page)
    }

    /// Check if a page is exposed at `/<page>` without a language prefix.
    pub fn is_top_level_route(&self, page: &str) -> bool {
        self.top_level_routes.iter().any(|name| name == page)
    }

    /// Get the template base path of a logical page.
    pub fn base_path_for(&self, page: &str) -> Option<&str> {
        self.page(page).map(|entry| entry.base_path.as_str())
    }

    /// Get the full page entry of a logical page.
    pub fn page(&self, page: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|entry| entry.name == page)
    }

    pub fn unknown_segment_policy(&self) -> UnknownSegmentPolicy {
        self.unknown_segment_policy
    }

    /// All supported languages, in configuration order.
    pub fn languages(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// All logical pages, in configuration order.
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }
}

const SITE_UNTRANSLATED: &[&str] = &[
    "blogs",
    "how-to-convert-cl-to-g",
    "what-is-cl-to-g",
    "density-guide",
    "contact",
    "about-us",
    "privacy-policy",
    "terms-conditions",
];

fn site_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig::new("en", "English", "English"),
        LanguageConfig::new("ar", "Arabic", "العربية"),
        LanguageConfig::new("de", "German", "Deutsch"),
        LanguageConfig::new("es", "Spanish", "Español"),
        LanguageConfig::new("fr", "French", "Français"),
        LanguageConfig::new("it", "Italian", "Italiano"),
        LanguageConfig::new("pt", "Portuguese", "Português"),
        LanguageConfig::new("ru", "Russian", "Русский"),
        LanguageConfig::new("tr", "Turkish", "Türkçe"),
    ]
}

fn site_pages() -> Vec<PageEntry> {
    vec![
        // The home page is the cL to g converter
        PageEntry::new("home", "cl-to-g/cl-to-g", PageKind::Tool),
        PageEntry::new("cl-to-g", "cl-to-g/cl-to-g", PageKind::Tool),
        PageEntry::new("g-to-cl", "g-to-cl/g-to-cl", PageKind::Tool),
        PageEntry::new("about-us", "pages/about-us", PageKind::Info),
        PageEntry::new("contact", "pages/contact", PageKind::Info),
        PageEntry::new("privacy-policy", "pages/privacy-policy", PageKind::Info),
        PageEntry::new("terms-conditions", "pages/terms-conditions", PageKind::Info),
        PageEntry::new("blogs", "blogs/blog_index", PageKind::Blog),
        PageEntry::new(
            "how-to-convert-cl-to-g",
            "blogs/how-to-convert-cl-to-g",
            PageKind::Blog,
        ),
        PageEntry::new("what-is-cl-to-g", "blogs/what-is-cl-to-g", PageKind::Blog),
        PageEntry::new("density-guide", "blogs/density-guide", PageKind::Blog),
    ]
}

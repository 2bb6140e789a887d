//! Language code type.
//!
//! A `LanguageCode` is only a short identifier such as `"en"` or `"fr"`.
//! Whether it is *supported* is decided by the [`LocaleTable`] it is checked
//! against, never by the code itself.
//!
//! [`LocaleTable`]: crate::i18n::LocaleTable

use serde::{Deserialize, Serialize};
use std::fmt;

/// The code that template naming treats specially (`_eng` suffix), regardless
/// of which language a deployment uses as its default.
pub const ENGLISH_CODE: &str = "en";

/// A short language identifier (ISO 639-1 style, e.g. "en", "fr").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code from any string-like value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// English, the language top-level pages are rendered in.
    pub fn english() -> Self {
        Self::new(ENGLISH_CODE)
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the literal `"en"` code.
    pub fn is_english(&self) -> bool {
        self.0 == ENGLISH_CODE
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

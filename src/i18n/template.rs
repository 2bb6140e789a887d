//! Template identifiers.
//!
//! English templates carry an `_eng` suffix; every other language uses its
//! own code. This is tied to the literal `"en"` code, not to whichever
//! language a deployment configures as its default.

use crate::i18n::language::LanguageCode;
use serde::Serialize;
use std::fmt;

/// Name of a template file relative to the template root,
/// e.g. `pages/contact_fr.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Build the template identifier for a base path in a language.
pub fn resolve(base_path: &str, lang: &LanguageCode) -> TemplateId {
    if lang.is_english() {
        TemplateId(format!("{}_eng.html", base_path))
    } else {
        TemplateId(format!("{}_{}.html", base_path, lang))
    }
}

//! Template coverage checking.
//!
//! Walks a [`LocaleTable`] and reports, for every page and every language it
//! can be requested in, whether the template directory holds the template
//! the renderer would load, and whether a missing translation is covered by
//! the default-language fallback.

use crate::i18n::language::LanguageCode;
use crate::i18n::registry::{LocaleTable, PageEntry};
use crate::i18n::template::{resolve, TemplateId};
use std::path::Path;

/// Outcome for one (page, language) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageStatus {
    /// The template for the requested language exists
    Present,
    /// Missing, but the default-language template will be served instead
    FallsBack(TemplateId),
    /// Requests for this pair end in a 404
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageEntry {
    pub page: String,
    pub lang: LanguageCode,
    pub template: TemplateId,
    pub status: CoverageStatus,
}

/// Coverage report for a whole locale table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub entries: Vec<CoverageEntry>,
}

impl CoverageReport {
    /// Pairs that end in a 404
    pub fn missing(&self) -> impl Iterator<Item = &CoverageEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.status == CoverageStatus::Missing)
    }

    /// Pairs served through the default-language fallback
    pub fn fallbacks(&self) -> impl Iterator<Item = &CoverageEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.status, CoverageStatus::FallsBack(_)))
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }
}

/// Check every page of `table` against the files under `template_dir`.
pub fn check(table: &LocaleTable, template_dir: &Path) -> CoverageReport {
    let exists = |id: &TemplateId| template_dir.join(id.as_str()).is_file();
    let mut report = CoverageReport::default();

    for page in table.pages() {
        for lang in requestable_languages(table, page) {
            let template = resolve(&page.base_path, &lang);
            let status = if exists(&template) {
                CoverageStatus::Present
            } else if lang.is_english() || &lang == table.default_language() {
                CoverageStatus::Missing
            } else {
                let fallback = resolve(&page.base_path, table.default_language());
                if exists(&fallback) {
                    CoverageStatus::FallsBack(fallback)
                } else {
                    CoverageStatus::Missing
                }
            };

            report.entries.push(CoverageEntry {
                page: page.name.clone(),
                lang,
                template,
                status,
            });
        }
    }

    report
}

/// Languages a page can actually be rendered in.
fn requestable_languages(table: &LocaleTable, page: &PageEntry) -> Vec<LanguageCode> {
    if table.is_untranslated(&page.name) {
        return vec![LanguageCode::english()];
    }

    let mut langs: Vec<LanguageCode> = table
        .languages()
        .iter()
        .map(|lang| lang.code.clone())
        .collect();
    if table.is_top_level_route(&page.name) && !langs.iter().any(LanguageCode::is_english) {
        langs.push(LanguageCode::english());
    }
    langs
}

//! Request dispatch: maps a normalized path to a routing decision.
//!
//! Dispatch is pure. It looks only at the path and the [`LocaleTable`];
//! rendering and response building happen in the handler.

use crate::i18n::{LanguageCode, LocaleTable, UnknownSegmentPolicy};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Logical page served at the root and at `/<lang>`.
pub const HOME_PAGE: &str = "home";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// 301
    Permanent,
    /// 302
    Found,
}

/// What to do with one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Render {
        lang: LanguageCode,
        page: String,
        /// Language recorded for the request and exposed to templates
        session_lang: LanguageCode,
    },
    Redirect {
        location: String,
        kind: RedirectKind,
    },
    NotFound,
}

impl Dispatch {
    fn render(lang: LanguageCode, page: &str) -> Self {
        Dispatch::Render {
            session_lang: lang.clone(),
            lang,
            page: page.to_string(),
        }
    }

    fn home_redirect() -> Self {
        Dispatch::Redirect {
            location: "/".to_string(),
            kind: RedirectKind::Permanent,
        }
    }
}

/// Decide how to answer a request path.
///
/// Segments are percent-decoded one by one, so an encoded `/` never adds a
/// segment.
///
/// # Arguments
/// * `table` - Locale table of the deployment
/// * `path` - Raw request path, already stripped of trailing slashes
///
/// # Returns
/// * `Dispatch::Render` for a page to render, with the request's language
/// * `Dispatch::Redirect` for unsupported languages, untranslated pages and
///   (depending on the policy) unknown segments
/// * `Dispatch::NotFound` for paths deeper than two segments
///
/// # Example
/// ```ignore
/// let table = LocaleTable::english_default();
/// assert_eq!(
///     dispatch(&table, "/de/contact"),
///     Dispatch::Redirect { location: "/contact".into(), kind: RedirectKind::Found },
/// );
/// ```
pub fn dispatch(table: &LocaleTable, path: &str) -> Dispatch {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if rest.is_empty() {
        return Dispatch::render(table.default_language().clone(), HOME_PAGE);
    }

    let segments: Vec<Cow<'_, str>> = rest
        .split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
        .collect();
    match segments.as_slice() {
        [segment] => single_segment(table, segment),
        [lang, page] => localized_page(table, lang, page),
        _ => Dispatch::NotFound,
    }
}

/// `/<segment>`: a top-level tool, a localized home, or an English page.
fn single_segment(table: &LocaleTable, segment: &str) -> Dispatch {
    if table.is_top_level_route(segment) {
        return Dispatch::render(LanguageCode::english(), segment);
    }

    if table.is_supported(segment) {
        return Dispatch::render(LanguageCode::new(segment), HOME_PAGE);
    }

    english_page(table, segment)
}

/// `/<page>` without a language prefix.
fn english_page(table: &LocaleTable, page: &str) -> Dispatch {
    if table.is_untranslated(page) {
        return Dispatch::render(LanguageCode::english(), page);
    }

    match table.unknown_segment_policy() {
        UnknownSegmentPolicy::RedirectHome => Dispatch::home_redirect(),
        UnknownSegmentPolicy::NotFound if table.base_path_for(page).is_some() => {
            Dispatch::render(LanguageCode::english(), page)
        }
        UnknownSegmentPolicy::NotFound => Dispatch::NotFound,
    }
}

/// `/<lang>/<page>`.
fn localized_page(table: &LocaleTable, lang: &str, page: &str) -> Dispatch {
    if !table.is_supported(lang) {
        return Dispatch::home_redirect();
    }

    // Untranslated content only has a canonical English URL
    if table.is_untranslated(page) {
        return Dispatch::Redirect {
            location: format!("/{}", page),
            kind: RedirectKind::Found,
        };
    }

    Dispatch::render(LanguageCode::new(lang), page)
}

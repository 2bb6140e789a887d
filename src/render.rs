//! Page rendering with one level of default-language fallback.

use crate::i18n::{
    resolve, LanguageCode, LanguageConfig, LocaleTable, PageEntry, PageKind, TemplateId,
};
use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure reported by a template engine.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("failed to render template '{template}': {message}")]
    Render { template: String, message: String },
}

/// Data available to every template.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'a> {
    /// Language the template is rendered in
    pub lang_code: &'a LanguageCode,
    pub current_page_name: &'a str,
    /// Tool, blog or info page, serialized as `"tool"`, `"blog"` or `"info"`
    pub page_kind: PageKind,
    /// Language resolved for the request, for the language switcher
    pub session_lang: &'a LanguageCode,
    pub default_lang: &'a LanguageCode,
    pub languages: &'a [LanguageConfig],
}

/// Maps a template identifier plus context to HTML.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &TemplateId, context: &RenderContext<'_>)
        -> Result<String, TemplateError>;
}

/// Template engine backed by MiniJinja.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Load templates lazily from files under `template_dir`.
    ///
    /// Nothing is read until a template is first requested, so a missing
    /// directory shows up as `TemplateError::NotFound` at render time.
    pub fn from_dir(template_dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(template_dir.as_ref()));
        Self { env }
    }

    /// Build an engine from in-memory `(name, source)` pairs.
    ///
    /// # Returns
    /// * `Err(TemplateError::Render)` for the first source that fails to parse
    ///
    /// # Example
    /// ```ignore
    /// let engine = MiniJinjaEngine::from_templates([
    ///     ("pages/contact_eng.html", "<h1>{{ current_page_name }}</h1>"),
    /// ])?;
    /// ```
    pub fn from_templates<I, N, S>(templates: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in templates {
            let name = name.into();
            env.add_template_owned(name.clone(), source.into())
                .map_err(|e| TemplateError::Render {
                    template: name,
                    message: e.to_string(),
                })?;
        }
        Ok(Self { env })
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(
        &self,
        template: &TemplateId,
        context: &RenderContext<'_>,
    ) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(template.as_str()).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound(template.to_string())
            } else {
                TemplateError::Render {
                    template: template.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        tmpl.render(context).map_err(|e| TemplateError::Render {
            template: template.to_string(),
            message: e.to_string(),
        })
    }
}

/// A successfully rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub template: TemplateId,
    /// Language actually rendered, which differs from the requested one after
    /// a fallback
    pub lang: LanguageCode,
}

/// Result of rendering a logical page.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderedPage),
    /// The page name is not in the page map
    UnknownPage { page: String },
    /// No usable template, after the fallback if one applied
    TemplateMissing {
        lang: LanguageCode,
        page: String,
        template: TemplateId,
        cause: TemplateError,
    },
}

/// Renders logical pages through a template engine.
pub struct PageRenderer {
    table: Arc<LocaleTable>,
    engine: Arc<dyn TemplateEngine>,
}

impl PageRenderer {
    pub fn new(table: Arc<LocaleTable>, engine: Arc<dyn TemplateEngine>) -> Self {
        Self { table, engine }
    }

    /// Render `page` in `lang`.
    ///
    /// When the template is missing or fails and `lang` is neither `"en"` nor
    /// the default language, the default-language template is tried once.
    ///
    /// # Arguments
    /// * `lang` - Language to render in
    /// * `page` - Logical page name from the page map
    /// * `session_lang` - Language resolved for the request, passed through to
    ///   the template context unchanged
    ///
    /// # Returns
    /// * `RenderOutcome::Rendered` with the language actually used
    /// * `RenderOutcome::UnknownPage` if `page` is not in the page map
    /// * `RenderOutcome::TemplateMissing` for the last template tried
    ///
    /// # Example
    /// ```ignore
    /// let de = LanguageCode::new("de");
    /// match renderer.render(&de, "home", &de) {
    ///     RenderOutcome::Rendered(page) => println!("{} via {}", page.lang, page.template),
    ///     other => eprintln!("{:?}", other),
    /// }
    /// ```
    pub fn render(
        &self,
        lang: &LanguageCode,
        page: &str,
        session_lang: &LanguageCode,
    ) -> RenderOutcome {
        let Some(entry) = self.table.page(page) else {
            debug!("Unknown page '{}'", page);
            return RenderOutcome::UnknownPage {
                page: page.to_string(),
            };
        };

        let (template, cause) = match self.attempt(entry, lang, session_lang) {
            Ok(rendered) => return RenderOutcome::Rendered(rendered),
            Err(failure) => failure,
        };

        let default = self.table.default_language();
        if lang.is_english() || lang == default {
            warn!("No template for page '{}' in '{}': {}", page, lang, cause);
            return RenderOutcome::TemplateMissing {
                lang: lang.clone(),
                page: page.to_string(),
                template,
                cause,
            };
        }

        warn!(
            "Template {} unavailable ({}), falling back to '{}'",
            template, cause, default
        );

        match self.attempt(entry, default, session_lang) {
            Ok(rendered) => RenderOutcome::Rendered(rendered),
            Err((template, cause)) => {
                warn!(
                    "Fallback for page '{}' in '{}' failed: {}",
                    page, default, cause
                );
                RenderOutcome::TemplateMissing {
                    lang: default.clone(),
                    page: page.to_string(),
                    template,
                    cause,
                }
            }
        }
    }

    fn attempt(
        &self,
        entry: &PageEntry,
        lang: &LanguageCode,
        session_lang: &LanguageCode,
    ) -> Result<RenderedPage, (TemplateId, TemplateError)> {
        let template = resolve(&entry.base_path, lang);
        let context = RenderContext {
            lang_code: lang,
            current_page_name: &entry.name,
            page_kind: entry.kind,
            session_lang,
            default_lang: self.table.default_language(),
            languages: self.table.languages(),
        };

        match self.engine.render(&template, &context) {
            Ok(html) => Ok(RenderedPage {
                html,
                template,
                lang: lang.clone(),
            }),
            Err(cause) => Err((template, cause)),
        }
    }
}

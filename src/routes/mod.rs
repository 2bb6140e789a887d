//! HTTP surface: router construction and the page handler.

mod dispatch;
mod normalize;

pub use dispatch::{dispatch, Dispatch, RedirectKind, HOME_PAGE};
pub use normalize::{is_static_path, redirect_trailing_slash, strip_trailing_slash, STATIC_PREFIX};

use crate::i18n::LocaleTable;
use crate::render::{PageRenderer, RenderOutcome, TemplateEngine};
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::{middleware, Router};
use minijinja::HtmlEscape;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, Level};

/// Shared, read-only state of the server.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<LocaleTable>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    /// Wrap a locale table and a template engine into shared state.
    ///
    /// # Arguments
    /// * `table` - Locale table, usually validated by the caller first
    /// * `engine` - Template engine the page renderer draws from
    pub fn new(table: LocaleTable, engine: Arc<dyn TemplateEngine>) -> Self {
        let table = Arc::new(table);
        let renderer = Arc::new(PageRenderer::new(Arc::clone(&table), engine));
        Self { table, renderer }
    }
}

/// Build the application router.
///
/// Pages go through [`dispatch`]; `/sitemap.xml` and everything under
/// [`STATIC_PREFIX`] are served from disk. Static directories are not
/// listed or indexed, so a directory URL is a plain 404.
///
/// # Arguments
/// * `state` - Locale table and renderer shared by all requests
/// * `site_root` - Directory holding `sitemap.xml` and `static/`
///
/// # Example
/// ```ignore
/// let engine = Arc::new(MiniJinjaEngine::from_dir("templates"));
/// let app = router(AppState::new(LocaleTable::english_default(), engine), ".");
/// axum::serve(listener, app).await?;
/// ```
pub fn router(state: AppState, site_root: impl AsRef<Path>) -> Router {
    let site_root = site_root.as_ref();
    let static_files =
        ServeDir::new(site_root.join("static")).append_index_html_on_directories(false);

    Router::new()
        .route_service("/sitemap.xml", ServeFile::new(site_root.join("sitemap.xml")))
        .nest_service(STATIC_PREFIX, static_files)
        .fallback(page)
        .with_state(state)
        .layer(middleware::from_fn(redirect_trailing_slash))
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn page(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match dispatch(&state.table, uri.path()) {
        Dispatch::Render {
            lang,
            page,
            session_lang,
        } => rendered_response(state.renderer.render(&lang, &page, &session_lang)),
        Dispatch::Redirect { location, kind } => {
            debug!("Redirecting {} -> {}", uri.path(), location);
            redirect_response(location, kind)
        }
        Dispatch::NotFound => page_not_found(),
    }
}

fn rendered_response(outcome: RenderOutcome) -> Response {
    match outcome {
        RenderOutcome::Rendered(page) => (
            [(header::CONTENT_LANGUAGE, page.lang.to_string())],
            Html(page.html),
        )
            .into_response(),
        RenderOutcome::UnknownPage { .. } => page_not_found(),
        RenderOutcome::TemplateMissing {
            lang,
            page,
            template,
            cause,
        } => {
            let cause = cause.to_string();
            let body = format!(
                "<h1>Error: Template not found for '{}' page '{}'</h1>\
                 <p>Please check if the file '{}' exists.</p>\
                 <p>Original error: {}</p>",
                HtmlEscape(lang.as_str()),
                HtmlEscape(&page),
                HtmlEscape(template.as_str()),
                HtmlEscape(&cause),
            );
            (StatusCode::NOT_FOUND, Html(body)).into_response()
        }
    }
}

fn redirect_response(location: String, kind: RedirectKind) -> Response {
    let status = match kind {
        RedirectKind::Permanent => StatusCode::MOVED_PERMANENTLY,
        RedirectKind::Found => StatusCode::FOUND,
    };
    (status, [(header::LOCATION, location)]).into_response()
}

fn page_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Page Not Found").into_response()
}

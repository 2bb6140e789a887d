//! Integration tests for the localized page router
//!
//! These tests drive the complete axum router (trailing-slash middleware,
//! dispatch, rendering and static files) without opening a socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use localized_pages::i18n::{
    LanguageCode, LanguageConfig, LocaleTable, PageEntry, PageKind, UnknownSegmentPolicy,
};
use localized_pages::render::MiniJinjaEngine;
use localized_pages::routes::{router, AppState};

// ==================== Test Helpers ====================

/// default fr, supported {fr, en, de}, untranslated {contact}
fn scenario_table() -> LocaleTable {
    LocaleTable::new(
        vec![
            LanguageConfig::new("fr", "French", "Français"),
            LanguageConfig::new("en", "English", "English"),
            LanguageConfig::new("de", "German", "Deutsch"),
        ],
        LanguageCode::new("fr"),
        vec![
            PageEntry::new("home", "cl-to-g/cl-to-g", PageKind::Tool),
            PageEntry::new("cl-to-g", "cl-to-g/cl-to-g", PageKind::Tool),
            PageEntry::new("g-to-cl", "g-to-cl/g-to-cl", PageKind::Tool),
            PageEntry::new("contact", "pages/contact", PageKind::Info),
        ],
    )
    .with_untranslated(["contact"])
}

/// Every template prints its own name plus the context it was rendered with.
fn template(name: &str) -> (String, String) {
    (
        name.to_string(),
        format!(
            "{}:{{{{ lang_code }}}}:{{{{ current_page_name }}}}:{{{{ session_lang }}}}",
            name
        ),
    )
}

fn scenario_templates() -> Vec<(String, String)> {
    vec![
        template("cl-to-g/cl-to-g_fr.html"),
        template("cl-to-g/cl-to-g_de.html"),
        template("cl-to-g/cl-to-g_eng.html"),
        // g-to-cl has no German translation
        template("g-to-cl/g-to-cl_fr.html"),
        template("pages/contact_eng.html"),
    ]
}

fn app_with(table: LocaleTable, templates: Vec<(String, String)>, site_root: &Path) -> Router {
    let engine = MiniJinjaEngine::from_templates(templates).expect("templates");
    router(AppState::new(table, Arc::new(engine)), site_root)
}

fn scenario_app(site_root: &Path) -> Router {
    app_with(scenario_table(), scenario_templates(), site_root)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn location(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

// ==================== Scenario Tests ====================

#[tokio::test]
async fn test_root_renders_home_in_default_language() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_fr.html:fr:home:fr");
    assert_eq!(headers[header::CONTENT_LANGUAGE], "fr");
}

#[tokio::test]
async fn test_language_root_renders_localized_home() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/de").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_de.html:de:home:de");
}

#[tokio::test]
async fn test_localized_untranslated_page_redirects_to_english_url() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, _) = get(&app, "/de/contact").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location(&headers), "/contact");
}

#[tokio::test]
async fn test_untranslated_page_renders_in_english() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, body) = get(&app, "/contact").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "pages/contact_eng.html:en:contact:en");
    assert_eq!(headers[header::CONTENT_LANGUAGE], "en");
}

#[tokio::test]
async fn test_unknown_segment_redirects_home() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, _) = get(&app, "/xx").await;
    assert!(status.is_redirection());
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn test_trailing_slash_is_stripped_once() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, _) = get(&app, "/cl-to-g/").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&headers), "/cl-to-g");

    // Following the redirect does not hit the normalizer again
    let (status, headers, _) = get(&app, "/de/cl-to-g/").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    let target = location(&headers).to_string();
    let (status, _, body) = get(&app, &target).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_de.html:de:cl-to-g:de");
}

#[tokio::test]
async fn test_trailing_slash_keeps_query() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, _) = get(&app, "/fr/?ref=nav").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&headers), "/fr?ref=nav");
}

// ==================== Fallback Tests ====================

#[tokio::test]
async fn test_missing_translation_falls_back_to_default_language() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, body) = get(&app, "/de/g-to-cl").await;
    assert_eq!(status, StatusCode::OK);
    // Rendered in French, but the request still belongs to German
    assert_eq!(body, "g-to-cl/g-to-cl_fr.html:fr:g-to-cl:de");
    assert_eq!(headers[header::CONTENT_LANGUAGE], "fr");
}

#[tokio::test]
async fn test_missing_english_template_is_404_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/en/g-to-cl").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Template not found for 'en' page 'g-to-cl'"));
    // Template names are HTML-escaped, including the '/'
    assert!(body.contains("g-to-cl&#x2f;g-to-cl_eng.html"));
}

#[tokio::test]
async fn test_failed_fallback_is_404() {
    let dir = TempDir::new().unwrap();
    let templates = vec![template("cl-to-g/cl-to-g_de.html")];
    let app = app_with(scenario_table(), templates, dir.path());

    // Neither the German nor the French g-to-cl template exists
    let (status, _, body) = get(&app, "/de/g-to-cl").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("g-to-cl&#x2f;g-to-cl_fr.html"));
}

#[tokio::test]
async fn test_unknown_localized_page_is_404() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/de/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Page Not Found");
}

// ==================== Redirect Policy Tests ====================

#[tokio::test]
async fn test_unsupported_language_prefix_redirects_home() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, headers, _) = get(&app, "/es/cl-to-g").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&headers), "/");
}

#[tokio::test]
async fn test_not_found_policy() {
    let dir = TempDir::new().unwrap();
    let table = scenario_table().with_unknown_segment_policy(UnknownSegmentPolicy::NotFound);
    let app = app_with(table, scenario_templates(), dir.path());

    let (status, _, _) = get(&app, "/xx").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = get(&app, "/cl-to-g").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_eng.html:en:cl-to-g:en");
}

#[tokio::test]
async fn test_top_level_tool_routes_render_in_english() {
    let dir = TempDir::new().unwrap();
    let app = app_with(
        LocaleTable::french_default(),
        vec![
            template("cl-to-g/cl-to-g_fr.html"),
            template("cl-to-g/cl-to-g_eng.html"),
        ],
        dir.path(),
    );

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_fr.html:fr:home:fr");

    let (status, _, body) = get(&app, "/cl-to-g").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_eng.html:en:cl-to-g:en");
}

#[tokio::test]
async fn test_percent_encoded_paths_route_like_decoded_ones() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/d%65").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cl-to-g/cl-to-g_de.html:de:home:de");

    let (status, headers, _) = get(&app, "/%64e/contact").await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location(&headers), "/contact");
}

#[tokio::test]
async fn test_deep_path_is_404() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, _) = get(&app, "/fr/blogs/extra").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/de")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ==================== Language Switcher Context ====================

#[tokio::test]
async fn test_templates_receive_supported_languages() {
    let dir = TempDir::new().unwrap();
    let templates = vec![(
        "cl-to-g/cl-to-g_de.html".to_string(),
        "{% for l in languages %}<a href=\"/{{ l.code }}\">{{ l.native_name }}</a>{% endfor %}"
            .to_string(),
    )];
    let app = app_with(scenario_table(), templates, dir.path());

    let (status, _, body) = get(&app, "/de").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "<a href=\"/fr\">Français</a><a href=\"/en\">English</a><a href=\"/de\">Deutsch</a>"
    );
}

// ==================== Static File Tests ====================

#[tokio::test]
async fn test_sitemap_served_verbatim() {
    let dir = TempDir::new().unwrap();
    let sitemap = "<?xml version=\"1.0\"?><urlset><url><loc>/</loc></url></urlset>";
    std::fs::write(dir.path().join("sitemap.xml"), sitemap).unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/sitemap.xml").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sitemap);

    let (status, headers, _) = get(&app, "/sitemap.xml/").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&headers), "/sitemap.xml");
}

#[tokio::test]
async fn test_missing_sitemap_is_404() {
    let dir = TempDir::new().unwrap();
    let app = scenario_app(dir.path());

    let (status, _, _) = get(&app, "/sitemap.xml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_assets_served() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
    std::fs::write(dir.path().join("static/js/script.js"), "function convertClToG() {}").unwrap();
    let app = scenario_app(dir.path());

    let (status, _, body) = get(&app, "/static/js/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "function convertClToG() {}");
}

#[tokio::test]
async fn test_static_directories_are_not_redirected() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
    std::fs::write(dir.path().join("static/js/index.html"), "<p>index</p>").unwrap();
    let app = scenario_app(dir.path());

    for uri in ["/static/js/", "/static/js"] {
        let (status, headers, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert!(headers.get(header::LOCATION).is_none(), "{}", uri);
        assert!(!body.contains("index"), "{}", uri);
    }

    // Files inside the directory are still reachable
    let (status, _, body) = get(&app, "/static/js/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<p>index</p>");
}

#[tokio::test]
async fn test_page_kind_available_to_templates() {
    let dir = TempDir::new().unwrap();
    let templates = vec![
        (
            "cl-to-g/cl-to-g_de.html".to_string(),
            "{{ page_kind }}".to_string(),
        ),
        (
            "pages/contact_eng.html".to_string(),
            "{{ page_kind }}".to_string(),
        ),
    ];
    let app = app_with(scenario_table(), templates, dir.path());

    let (_, _, body) = get(&app, "/de/cl-to-g").await;
    assert_eq!(body, "tool");
    let (_, _, body) = get(&app, "/contact").await;
    assert_eq!(body, "info");
}

// ==================== Template Files On Disk ====================

#[tokio::test]
async fn test_templates_loaded_from_directory() {
    let site = TempDir::new().unwrap();
    let templates = TempDir::new().unwrap();
    std::fs::create_dir_all(templates.path().join("cl-to-g")).unwrap();
    std::fs::write(
        templates.path().join("cl-to-g/cl-to-g_eng.html"),
        "<h1>cL to g</h1><p>{{ lang_code }}</p>",
    )
    .unwrap();

    let engine = MiniJinjaEngine::from_dir(templates.path());
    let app = router(
        AppState::new(LocaleTable::english_default(), Arc::new(engine)),
        site.path(),
    );

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>cL to g</h1><p>en</p>");

    // Russian falls back to the English default template
    let (status, _, body) = get(&app, "/ru").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>cL to g</h1><p>en</p>");
}

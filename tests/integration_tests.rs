//! Integration tests for the i18n gateway
//!
//! These tests start the real router on a local port and talk to it over
//! HTTP, with dictionaries served from a temporary directory or a mock
//! bundle server.

use reqwest::{header, redirect, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::assert_ok;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use i18n_gateway::{
    config::Config,
    error::DictionaryLoadError,
    i18n::{DictionaryLoader, HttpBundleSource, LoaderOptions, LocaleRegistry},
    retry::RetryConfig,
    server::{build_router, AppState},
};

// ==================== Test Helpers ====================

const EN: &str = r#"{"common": {"title": "Home", "greeting": "Hello {name}"}}"#;
const ZH: &str = r#"{"common": {"title": "首页", "greeting": "你好 {name}"}}"#;

/// Write bundles into a temporary dictionary directory
fn write_dictionaries(bundles: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (locale, content) in bundles {
        std::fs::write(dir.path().join(format!("{}.json", locale)), content)
            .expect("Failed to write bundle");
    }
    dir
}

/// Start the gateway on an ephemeral port and return its base URL
async fn spawn_gateway(config: Config) -> String {
    let registry = Arc::new(config.build_registry().expect("Valid registry"));
    let loader = Arc::new(
        DictionaryLoader::new(registry.clone(), config.bundle_source().expect("Source"))
            .with_options(config.loader_options()),
    );
    let pipeline = Arc::new(config.pipeline(registry.clone()));
    let app = build_router(AppState::new(registry, loader, pipeline));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client")
}

fn directory_config(dir: &TempDir) -> Config {
    Config {
        dictionary_dir: dir.path().to_path_buf(),
        ..Config::default()
    }
}

// ==================== Redirect Tests ====================

#[tokio::test]
async fn test_root_redirects_to_default_without_cookie() {
    let dir = write_dictionaries(&[("en", EN)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client().get(format!("{}/", base)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/en");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_accept_language_redirect_sets_cookie() {
    let dir = write_dictionaries(&[("en", EN), ("zh-CN", ZH)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client()
        .get(format!("{}/foo?tab=2", base))
        .header(header::ACCEPT_LANGUAGE, "en;q=0.5, zh-CN;q=0.9")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/zh-CN/foo?tab=2");
    assert_eq!(
        response.headers()[header::SET_COOKIE],
        "locale=zh-CN; Path=/; Max-Age=31536000; SameSite=Lax"
    );
}

#[tokio::test]
async fn test_cookie_redirect_does_not_rewrite_cookie() {
    let dir = write_dictionaries(&[("en", EN)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client()
        .get(format!("{}/foo", base))
        .header(header::COOKIE, "locale=zh-CN")
        .header(header::ACCEPT_LANGUAGE, "ja")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/zh-CN/foo");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_excluded_paths_are_not_redirected() {
    let dir = write_dictionaries(&[("en", EN)]);
    let base = spawn_gateway(directory_config(&dir)).await;
    let client = client();

    let response = client
        .get(format!("{}/api/health", base))
        .header(header::ACCEPT_LANGUAGE, "zh-CN")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    // Not served by the gateway, but must not be redirected either
    let response = client.get(format!("{}/robots.txt", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_extra_excluded_path_from_config() {
    let dir = write_dictionaries(&[("en", EN)]);
    let config = Config {
        extra_excluded_paths: vec!["/manifest.json".to_string()],
        ..directory_config(&dir)
    };
    let base = spawn_gateway(config).await;

    let response = client()
        .get(format!("{}/manifest.json", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Page Tests ====================

#[tokio::test]
async fn test_qualified_page_renders_context() {
    let dir = write_dictionaries(&[("en", EN), ("zh-CN", ZH)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client()
        .get(format!("{}/zh-CN/guides/visa", base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let body: serde_json::Value = assert_ok!(response.json().await);
    assert_eq!(body["locale"], "zh-CN");
    assert_eq!(body["label"], "简体中文");
    assert_eq!(body["path"], "/guides/visa");
    assert_eq!(body["title"], "首页");
    assert_eq!(body["messages"]["common"]["greeting"], "你好 {name}");
    assert_eq!(body["alternates"][0]["href"], "/en/guides/visa");
}

#[tokio::test]
async fn test_missing_bundle_falls_back_to_default() {
    let dir = write_dictionaries(&[("en", EN)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client().get(format!("{}/ar", base)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["locale"], "ar");
    assert_eq!(body["title"], "Home");
}

#[tokio::test]
async fn test_malformed_default_bundle_is_server_error() {
    let dir = write_dictionaries(&[("en", "{ not json")]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client().get(format!("{}/en", base)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap();
    assert!(!body.contains("not json"));
}

#[tokio::test]
async fn test_stale_cookie_refreshed_on_qualified_page() {
    let dir = write_dictionaries(&[("en", EN)]);
    let base = spawn_gateway(directory_config(&dir)).await;

    let response = client()
        .get(format!("{}/en/about", base))
        .header(header::COOKIE, "theme=dark; locale=ja")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::SET_COOKIE],
        "locale=en; Path=/; Max-Age=31536000; SameSite=Lax"
    );
}

// ==================== Remote Bundle Tests ====================

#[tokio::test]
async fn test_remote_bundles_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/i18n/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        dictionary_base_url: Some(format!("{}/i18n", mock_server.uri())),
        ..Config::default()
    };
    let base = spawn_gateway(config).await;
    let client = client();

    for _ in 0..3 {
        let response = client.get(format!("{}/en", base)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let metrics: serde_json::Value = client
        .get(format!("{}/api/i18n/metrics", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["loader"]["bundle_fetches"], 1);
    assert_eq!(metrics["cached_locales"], serde_json::json!(["en"]));
}

#[tokio::test]
async fn test_concurrent_remote_loads_share_one_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zh-CN.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ZH)
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = Arc::new(LocaleRegistry::app_family());
    let source = HttpBundleSource::new(reqwest::Client::new(), mock_server.uri());
    let loader = Arc::new(DictionaryLoader::new(registry, Arc::new(source)));

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load("zh-CN").await })
        })
        .collect();

    let mut dictionaries = Vec::new();
    for handle in handles {
        dictionaries.push(handle.await.unwrap().expect("Should load"));
    }

    assert!(dictionaries
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    assert_eq!(dictionaries[0].lookup("common.title"), Some("首页"));
}

#[tokio::test]
async fn test_remote_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sv.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let registry = Arc::new(LocaleRegistry::app_family());
    let source = HttpBundleSource::new(reqwest::Client::new(), mock_server.uri());
    let loader = DictionaryLoader::new(registry, Arc::new(source));

    let error = loader.load("sv").await.unwrap_err();
    assert_eq!(error.locale(), "sv");
}

/// Loader that retries quickly, so retry counts show up in mock expectations
fn retrying_loader(base_url: String) -> DictionaryLoader {
    let registry = Arc::new(LocaleRegistry::app_family());
    let source = HttpBundleSource::new(reqwest::Client::new(), base_url);
    DictionaryLoader::new(registry, Arc::new(source)).with_options(LoaderOptions {
        fetch_timeout: Some(Duration::from_secs(5)),
        retry: RetryConfig::new(3, Duration::from_millis(10)),
    })
}

#[tokio::test]
async fn test_remote_forbidden_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ja.json"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = retrying_loader(mock_server.uri());

    let error = loader.load("ja").await.unwrap_err();
    assert_eq!(
        error,
        DictionaryLoadError::Rejected {
            locale: "ja".to_string(),
            status: 403,
        }
    );
}

#[tokio::test]
async fn test_remote_unavailable_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ja.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let loader = retrying_loader(mock_server.uri());

    let error = loader.load("ja").await.unwrap_err();
    assert!(matches!(error, DictionaryLoadError::Fetch { .. }));
}

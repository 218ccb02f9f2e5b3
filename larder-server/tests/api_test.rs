//! Router tests against an in-memory larder.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use larder_catalog::{Larder, ProductUnits, RawCatalog, RecipeCatalog};
use larder_server::{app, AppState, ServerOpts};
use larder_units::{ConversionContext, Measurement, Product};
use serde_json::{json, Value};
use tower::ServiceExt;

fn larder() -> Larder {
    let mut context = ConversionContext::new();
    context
        .conversions
        .insert_base("cup", Measurement::new(240.0, "ml"));
    context
        .conversions
        .insert_for_product("cup", "flour", Measurement::new(120.0, "g"));
    context.product_aliases.insert("plain flour", "flour");

    let mut raw = RawCatalog::new();
    raw.add_ingredient("cake", Product::new("flour", 300.0, "g"));
    raw.add_ingredient("cake", Product::new("sugar", 200.0, "g"));
    raw.add_ingredient("cookies", Product::new("flour", 200.0, "g"));
    raw.add_ingredient("cookies", Product::new("sugar", 100.0, "g"));
    raw.add_source("cake", "Family cookbook");
    raw.add_source("cookies", "https://example.org/cookies");

    let products = raw.ingredient_names();
    let product_units = ProductUnits::from_conversions(&context.conversions);
    let catalog = RecipeCatalog::build(raw, &context).unwrap();
    Larder {
        context,
        catalog,
        products,
        product_units,
    }
}

fn opts(debug: bool) -> ServerOpts {
    ServerOpts {
        bind_host: "127.0.0.1".to_string(),
        port: 0,
        http_origin: Some("https://larder.example".to_string()),
        debug,
        tls_cert_file: None,
        tls_key_file: None,
    }
}

fn router() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(larder()));
    (app(state.clone(), &opts(false)).unwrap(), state)
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_products_lists_sorted_names() {
    let (app, _) = router();
    let resp = app
        .oneshot(Request::builder().uri("/products").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!(["flour", "sugar"]));
}

#[tokio::test]
async fn test_units_for_known_and_unknown_products() {
    let (app, _) = router();
    let resp = app
        .clone()
        .oneshot(post("/units", json!({"product": "plain flour"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!(["cup", "g", "ml"]));

    let resp = app
        .oneshot(post("/units", json!({"product": "saffron"})))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn test_recipes_returns_maximal_sets_with_sources() {
    let (app, state) = router();
    let resp = app
        .oneshot(post(
            "/recipes",
            json!({
                "numberOfServings": 1,
                "availableProducts": {
                    "flour": {"quantity": 500.0, "unit": "g"},
                    "sugar": {"quantity": 200.0, "unit": "g"}
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!([
            [{"name": "cake", "source": "Family cookbook"}],
            [{"name": "cookies", "source": "https://example.org/cookies"}]
        ])
    );
    assert_eq!(state.metrics.suggestion_requests.get(), 1);
    assert_eq!(state.metrics.subsets_evaluated.get(), 3);
    assert_eq!(state.metrics.maximal_sets_returned.get(), 2);
}

#[tokio::test]
async fn test_recipes_normalizes_stock_units() {
    let (app, _) = router();
    let resp = app
        .oneshot(post(
            "/recipes",
            json!({
                "numberOfServings": 2,
                "availableProducts": {
                    "plain flour": {"quantity": 4.0, "unit": "cup"},
                    "sugar": {"quantity": 250.0, "unit": "g"}
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!([[{"name": "cookies", "source": "https://example.org/cookies"}]])
    );
}

#[tokio::test]
async fn test_recipes_colliding_aliases_resolve_the_same_way_every_time() {
    let request = json!({
        "availableProducts": {
            "flour": {"quantity": 500.0, "unit": "g"},
            "plain flour": {"quantity": 1.0, "unit": "bag"},
            "sugar": {"quantity": 200.0, "unit": "g"}
        }
    });

    for _ in 0..20 {
        let (app, _) = router();
        let resp = app.oneshot(post("/recipes", request.clone())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        // "plain flour" sorts after "flour", so its bag measurement wins and
        // no recipe can compare grams against it.
        assert_eq!(body_json(resp).await, json!([]));
    }
}

#[tokio::test]
async fn test_recipes_rejects_invalid_json() {
    let (app, _) = router();
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/recipes")
                .header("content-type", "application/json")
                .body(Body::from(b"not json".to_vec()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_health_and_metrics() {
    let (app, _) = router();
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");

    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("larder_suggestion_requests_total"));
}

#[tokio::test]
async fn test_cors_uses_configured_origin() {
    let (app, _) = router();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .header("origin", "https://larder.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "https://larder.example"
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin_in_debug() {
    let state = Arc::new(AppState::new(larder()));
    let app = app(state, &opts(true)).unwrap();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[test]
fn test_invalid_origin_is_rejected() {
    let state = Arc::new(AppState::new(larder()));
    let mut bad = opts(false);
    bad.http_origin = Some("bad\norigin".to_string());
    assert!(app(state, &bad).is_err());
}

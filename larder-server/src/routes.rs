//! Product, unit and recipe suggestion endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use larder_core::{Suggester, Suggestion};
use larder_units::{Measurement, Product};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::AppState;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitsRequest {
    pub product: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipesRequest {
    #[serde(default = "default_servings")]
    pub number_of_servings: i64,
    /// Ordered by name so that colliding aliases resolve the same way on
    /// every request.
    #[serde(default)]
    pub available_products: BTreeMap<String, Measurement>,
}

fn default_servings() -> i64 {
    1
}

/// GET /products: every product named by a recipe, sorted.
async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.larder.products.clone())
}

/// POST /units: units the product may be entered in.
async fn list_units(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnitsRequest>,
) -> Json<Vec<String>> {
    let product = state
        .larder
        .context
        .product_aliases
        .canonical(&req.product);
    Json(state.larder.product_units.units(product))
}

/// POST /recipes: maximal recipe sets the stock can cover.
async fn suggest_recipes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecipesRequest>,
) -> Result<Json<Vec<Vec<Suggestion>>>, (StatusCode, String)> {
    state.metrics.suggestion_requests.inc();

    let stock: Vec<Product> = req
        .available_products
        .into_iter()
        .map(|(name, measurement)| Product { name, measurement })
        .collect();
    info!(
        "Suggesting recipes for {} products at {} servings",
        stock.len(),
        req.number_of_servings
    );

    let worker = Arc::clone(&state);
    let servings = req.number_of_servings;
    let result = tokio::task::spawn_blocking(move || {
        Suggester::new(&worker.larder.context, &worker.larder.catalog).suggest(stock, servings)
    })
    .await
    .map_err(|e| {
        state.metrics.suggestion_failures.inc();
        error!("Suggestion task failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Suggestion task failed: {}", e),
        )
    })?;

    let suggestions = result.map_err(|e| {
        state.metrics.suggestion_failures.inc();
        error!("Failed to suggest recipes: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    state.metrics.subsets_evaluated.inc_by(suggestions.evaluated);
    state
        .metrics
        .maximal_sets_returned
        .inc_by(suggestions.sets.len() as u64);

    Ok(Json(suggestions.sets))
}

/// Build the product, unit and recipe router.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/units", post(list_units))
        .route("/recipes", post(suggest_recipes))
        .with_state(state)
}

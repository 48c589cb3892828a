//! NetOptimize AI backend
//!
//! A thin HTTP gateway that turns telecom planning requests into prompts, forwards
//! them to a Gemini model and hands the model's text back to the caller untouched.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod llm_client;
pub mod models;
pub mod prompts;
pub mod validation;

use error::GatewayError;
use llm_client::ChatModel;
use models::{
    NetworkDesignRequest, PolicyAnalysisRequest, ResourceOptimizationRequest, RootResponse,
};
use validation::{
    payload_limit_config, validate_request_middleware, ApiValidationError, ANALYZE_POLICY_PATH,
    OPTIMIZE_NETWORK_PATH, RESOURCE_ALLOCATION_PATH,
};

pub const WELCOME_MESSAGE: &str = "Welcome to NetOptimize AI Backend!";

/// State shared by every handler; the model handle is built once at startup
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn ChatModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Send a prompt as a single user message and return the reply unmodified
    async fn complete(&self, operation: &'static str, prompt: String) -> Result<String, GatewayError> {
        match self.model.generate(&prompt).await {
            Ok(text) => {
                tracing::info!(operation, response_len = text.len(), "Model call succeeded");
                Ok(text)
            }
            Err(err) => {
                tracing::error!(operation, "Error in {}: {}", operation, err);
                Err(GatewayError::Upstream(err))
            }
        }
    }
}

/// Any origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so everything mirrors the preflight.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route(ANALYZE_POLICY_PATH, post(analyze_policy_handler))
        .route(OPTIMIZE_NETWORK_PATH, post(optimize_network_handler))
        .route(RESOURCE_ALLOCATION_PATH, post(resource_allocation_handler))
        // Slash-less paths answer 307 so the body is re-sent to the canonical route
        .route("/analyze_policy", post(|| async { Redirect::temporary(ANALYZE_POLICY_PATH) }))
        .route("/optimize_network", post(|| async { Redirect::temporary(OPTIMIZE_NETWORK_PATH) }))
        .route(
            "/resource_allocation",
            post(|| async { Redirect::temporary(RESOURCE_ALLOCATION_PATH) }),
        )
        .layer(middleware::from_fn(validate_request_middleware))
        .layer(payload_limit_config())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// GET / - Root endpoint
async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// POST /analyze_policy/ - Telecom policy summary, risks and recommendations
async fn analyze_policy_handler(
    State(state): State<AppState>,
    payload: Result<Json<PolicyAnalysisRequest>, JsonRejection>,
) -> Result<Json<String>, GatewayError> {
    let Json(request) = payload.map_err(ApiValidationError::from)?;
    tracing::info!(country = %request.country, "Policy analysis request");

    let prompt = prompts::policy_analysis_prompt(&request);
    state.complete("analyze_policy", prompt).await.map(Json)
}

/// POST /optimize_network/ - Network plan, cost estimate and coverage
async fn optimize_network_handler(
    State(state): State<AppState>,
    payload: Result<Json<NetworkDesignRequest>, JsonRejection>,
) -> Result<Json<String>, GatewayError> {
    let Json(request) = payload.map_err(ApiValidationError::from)?;
    tracing::info!(
        region = %request.region,
        infrastructure_items = request.existing_infrastructure.len(),
        budget = request.budget,
        "Network design request"
    );

    let prompt = prompts::network_design_prompt(&request);
    state.complete("optimize_network", prompt).await.map(Json)
}

/// POST /resource_allocation/ - Underutilized assets, allocation and savings
async fn resource_allocation_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResourceOptimizationRequest>, JsonRejection>,
) -> Result<Json<String>, GatewayError> {
    let Json(request) = payload.map_err(ApiValidationError::from)?;
    tracing::info!(
        region = %request.region,
        asset_count = request.existing_assets.len(),
        budget = request.budget,
        "Resource allocation request"
    );

    let prompt = prompts::resource_allocation_prompt(&request);
    state.complete("resource_allocation", prompt).await.map(Json)
}

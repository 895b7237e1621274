use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::profile::describe_validation_errors;
use crate::core::{filter_items, ClothingFilter};
use crate::models::{
    BodyType, BodyTypeInfo, CatalogItemsQuery, ErrorResponse, Gender, GenerateOutfitRequest,
    HealthResponse, Season, SeasonResponse,
};
use crate::pipeline::OutfitPipeline;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<OutfitPipeline>,
}

/// Configure all outfit-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/outfits/generate", web::post().to(generate_outfit))
        .route("/body-types", web::get().to(body_types))
        .route("/season", web::get().to(current_season))
        .route("/catalog/items", web::get().to(catalog_items));
}

fn error_response(status_code: u16, error: &str, message: String) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pipeline = &state.pipeline;
    let catalog_healthy = pipeline.catalog().health_check().await;

    let status = if catalog_healthy && pipeline.llm_configured() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        current_season: Season::current(),
        llm_configured: pipeline.llm_configured(),
        image_configured: pipeline.image_configured(),
        catalog_items: pipeline.catalog().loaded_len(),
    })
}

/// Generate outfit endpoint
///
/// POST /api/v1/outfits/generate
///
/// Request body:
/// ```json
/// {
///   "user_message": "male, 180, 75, 28, 43, nike, style: streetwear urban",
///   "body_type": "athletic",
///   "user_name": "string"
/// }
/// ```
async fn generate_outfit(
    state: web::Data<AppState>,
    req: web::Json<GenerateOutfitRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for generate_outfit request: field_errors={:?}", errors);
        return error_response(400, "validation_error", describe_validation_errors(&errors));
    }

    match state.pipeline.generate(&req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            if e.status_code() >= 500 {
                tracing::error!("Outfit generation failed: {}", e);
            } else {
                tracing::info!("Outfit generation rejected: {}", e);
            }
            error_response(e.status_code(), e.kind(), e.to_string())
        }
    }
}

/// List the accepted body types
async fn body_types() -> impl Responder {
    let types: Vec<BodyTypeInfo> = BodyType::ALL
        .iter()
        .map(|bt| BodyTypeInfo {
            value: bt.as_str().to_string(),
            label: bt.label().to_string(),
            description: bt.description().to_string(),
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({ "body_types": types }))
}

/// Season derived from today's date
async fn current_season() -> impl Responder {
    HttpResponse::Ok().json(season_info(Season::current()))
}

pub fn season_info(season: Season) -> SeasonResponse {
    SeasonResponse {
        season,
        name: season.name().to_string(),
        months: season.months().to_string(),
        description: season.styling_description().to_string(),
        fabrics: season.fabrics().iter().map(|f| f.to_string()).collect(),
        outerwear: if season.outerwear_required() {
            "Required".to_string()
        } else {
            "Optional".to_string()
        },
    }
}

fn parse_gender(raw: &str) -> Option<Gender> {
    match raw.trim().to_lowercase().as_str() {
        "man" | "men" | "male" => Some(Gender::Man),
        "woman" | "women" | "female" => Some(Gender::Woman),
        "unisex" => Some(Gender::Unisex),
        _ => None,
    }
}

/// Browse the catalog
///
/// GET /api/v1/catalog/items?gender=man&brand=zara&color=black&price_max=50
async fn catalog_items(
    state: web::Data<AppState>,
    query: web::Query<CatalogItemsQuery>,
) -> impl Responder {
    let query = query.into_inner();

    let gender = match query.gender.as_deref().filter(|g| !g.trim().is_empty()) {
        Some(raw) => match parse_gender(raw) {
            Some(gender) => Some(gender),
            None => {
                return error_response(
                    400,
                    "invalid_query",
                    format!("Unknown gender '{}'. Use man, woman or unisex.", raw),
                )
            }
        },
        None => None,
    };

    let filter = ClothingFilter {
        gender,
        brand: query.brand,
        category: query.category,
        style: query.style,
        colors: query.color.into_iter().collect(),
        price_min: query.price_min,
        price_max: query.price_max,
    };

    let items = match state.pipeline.catalog().items().await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to load catalog: {}", e);
            return error_response(500, "catalog_error", e.to_string());
        }
    };

    let matched = filter_items(&items, &filter);
    tracing::debug!("Catalog query {:?} matched {} of {} items", filter, matched.len(), items.len());

    HttpResponse::Ok().json(serde_json::json!({
        "total": matched.len(),
        "items": matched,
    }))
}

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use outfit_engine::config::{CatalogSource, Settings};
use outfit_engine::pipeline::OutfitPipeline;
use outfit_engine::routes::{self, AppState};
use outfit_engine::services::catalog::seed_postgres;
use outfit_engine::services::{CatalogStore, ImageClient, LlmClient, PostgresClient};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting outfit recommendation service...");
    info!("Configuration loaded successfully");

    let catalog = match settings.catalog.source {
        CatalogSource::Json => {
            info!("Using JSON catalog at {}", settings.catalog.json_dir.display());
            CatalogStore::json(settings.catalog.json_dir.clone())
        }
        CatalogSource::Postgres => {
            let postgres = PostgresClient::from_settings(&settings.database)
                .await
                .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            if let Some(seed_dir) = &settings.catalog.seed_dir {
                match seed_postgres(&postgres, seed_dir).await {
                    Ok(inserted) => info!("Seeded {} items from {}", inserted, seed_dir.display()),
                    Err(e) => warn!("Catalog seeding from {} failed: {}", seed_dir.display(), e),
                }
            }

            CatalogStore::postgres(Arc::new(postgres))
        }
    };
    let catalog = Arc::new(catalog);

    // Warm the catalog so the first request does not pay for the load
    match catalog.items().await {
        Ok(items) => info!("Catalog ready with {} items", items.len()),
        Err(e) => warn!("Catalog not loaded at startup, will retry on first request: {}", e),
    }

    let llm = LlmClient::new(&settings.llm).map_err(|e| startup_error("Failed to build LLM client", e))?;
    if !llm.is_configured() {
        warn!("OPENAI_API_KEY is missing, outfit generation will fail until it is set");
    }

    let image = ImageClient::from_settings(&settings.image)
        .map_err(|e| startup_error("Failed to build image client", e))?;
    if image.is_none() {
        info!("TOGETHER_API_KEY not found, image generation disabled");
    }

    let pipeline = Arc::new(OutfitPipeline::new(catalog, llm, image, settings.outfit.clone()));

    info!(
        "Pipeline initialized (shoe source: {:?}, palette history: {})",
        settings.outfit.shoe_source, settings.outfit.palette_history
    );

    let app_state = AppState { pipeline };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

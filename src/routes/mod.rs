// Route exports
pub mod outfits;

use actix_web::web;

pub use outfits::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(outfits::configure),
    );
}

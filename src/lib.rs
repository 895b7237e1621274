//! Outfit Engine - outfit recommendation service
//!
//! Turns a short free-text profile into a concrete outfit drawn from a
//! clothing catalog, with an LLM-written description, styling tips and an
//! optional mannequin render.

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compute_measurements, parse_message, PaletteSelector};
pub use models::{ClothingItem, GenerateOutfitRequest, GenerateOutfitResponse, UserProfile};
pub use pipeline::{OutfitError, OutfitPipeline};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let measurements = compute_measurements(180, 75, models::Sex::Male);
        assert!(measurements.bmi > 23.0);
        assert!(parse_message("female, 165").height.is_some());
    }
}

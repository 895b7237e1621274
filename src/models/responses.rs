use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::{
    BodyMeasurements, ColorPalette, FitSummary, OutfitSelection, Season, UserProfile,
};

/// Response for the outfit generation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutfitResponse {
    pub request_id: String,
    pub outfit_description: String,
    pub outfit_summary: String,
    pub image_url: Option<String>,
    pub styling_tips: String,
    pub primary_palette: ColorPalette,
    pub alternative_palette: String,
    pub measurements: BodyMeasurements,
    pub user_profile: UserProfile,
    pub fits: FitSummary,
    pub shoe_recommendation: String,
    pub selected_items: OutfitSelection,
    pub product_links: BTreeMap<String, String>,
    pub top_matches: Vec<String>,
    pub season: String,
    pub formatted_response: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub current_season: Season,
    pub llm_configured: bool,
    pub image_configured: bool,
    pub catalog_items: Option<usize>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// One entry of the body type listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyTypeInfo {
    pub value: String,
    pub label: String,
    pub description: String,
}

/// Current season information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonResponse {
    pub season: Season,
    pub name: String,
    pub months: String,
    pub description: String,
    pub fabrics: Vec<String>,
    pub outerwear: String,
}

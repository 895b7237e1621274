//! Outfit generation pipeline
//!
//! Validates the profile, extracts style keywords, selects catalog items,
//! picks palettes, then asks the LLM for a description and tips and the
//! image API for a render. Only the image step is allowed to fail.

use std::sync::Arc;
use thiserror::Error;
use crate::config::{OutfitSettings, ShoeSource};
use crate::core::parser::format_instructions;
use crate::core::prompts::{self, PromptContext, OUTFIT_SYSTEM, STYLE_EXTRACTION_SYSTEM, TIPS_SYSTEM};
use crate::core::{
    build_profile, compute_measurements, filter_items, parse_message, pick_generated_shoe,
    product_links, score_and_rank, select_outfit, shoe_for, summarize_fits, validate_outfit,
    ClothingFilter, PaletteSelector, ProfileError,
};
use crate::models::{
    BodyType, GarmentSlot, GenerateOutfitRequest, GenerateOutfitResponse, Season, ShoeChoice,
};
use crate::services::{CatalogError, CatalogStore, ImageClient, LlmClient, LlmError};

/// Keywords taken from the style text when the LLM returned none
const FALLBACK_PALETTE_WORDS: usize = 5;

#[derive(Debug, Error)]
pub enum OutfitError {
    #[error("{0}")]
    Validation(String),

    #[error("No items found matching filters. Try different style/brand.")]
    NoItems,

    #[error("Incomplete outfit - missing: {}", .0.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))]
    IncompleteOutfit(Vec<GarmentSlot>),

    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<ProfileError> for OutfitError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::MissingField(_) => {
                OutfitError::Validation(format!("{}\n\n{}", err, format_instructions()))
            }
            ProfileError::Invalid(_) => OutfitError::Validation(err.to_string()),
        }
    }
}

impl OutfitError {
    pub fn status_code(&self) -> u16 {
        match self {
            OutfitError::Validation(_) | OutfitError::NoItems | OutfitError::IncompleteOutfit(_) => 400,
            OutfitError::Llm(_) => 502,
            OutfitError::Catalog(_) => 500,
        }
    }

    /// Machine-readable error tag for the response body
    pub fn kind(&self) -> &'static str {
        match self {
            OutfitError::Validation(_) => "validation_error",
            OutfitError::NoItems => "no_items",
            OutfitError::IncompleteOutfit(_) => "incomplete_outfit",
            OutfitError::Llm(_) => "upstream_error",
            OutfitError::Catalog(_) => "catalog_error",
        }
    }
}

pub struct OutfitPipeline {
    catalog: Arc<CatalogStore>,
    llm: LlmClient,
    image: Option<ImageClient>,
    palettes: PaletteSelector,
    settings: OutfitSettings,
}

impl OutfitPipeline {
    pub fn new(
        catalog: Arc<CatalogStore>,
        llm: LlmClient,
        image: Option<ImageClient>,
        settings: OutfitSettings,
    ) -> Self {
        Self {
            catalog,
            llm,
            image,
            palettes: PaletteSelector::new(settings.palette_history),
            settings,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn llm_configured(&self) -> bool {
        self.llm.is_configured()
    }

    pub fn image_configured(&self) -> bool {
        self.image.is_some()
    }

    pub async fn generate(&self, request: &GenerateOutfitRequest) -> Result<GenerateOutfitResponse, OutfitError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let body_type: BodyType = request.body_type.parse().map_err(OutfitError::Validation)?;

        let parsed = parse_message(&request.user_message);
        let profile = build_profile(parsed, body_type)?;

        tracing::info!(
            "[{}] Generating outfit for {}: {} {}cm {}kg {}yo, {}",
            request_id,
            request.user_name,
            profile.sex,
            profile.height,
            profile.weight,
            profile.age,
            profile.body_type
        );

        let measurements = compute_measurements(profile.height, profile.weight, profile.sex);
        let season = Season::current();
        let fits = summarize_fits(profile.body_type, &profile.style_description);

        tracing::debug!(
            "[{}] Measurements: chest={} waist={} hips={} bmi={}",
            request_id,
            measurements.chest_circumference,
            measurements.waist_circumference,
            measurements.hip_circumference,
            measurements.bmi
        );

        let keywords = self
            .llm
            .extract_style_keywords(STYLE_EXTRACTION_SYSTEM, &prompts::style_extraction_prompt(&profile, season))
            .await
            .map_err(|e| {
                tracing::error!("[{}] Style keyword extraction failed: {}", request_id, e);
                e
            })?;

        tracing::info!(
            "[{}] Keywords: style={:?} colors={:?} fit={:?}",
            request_id,
            keywords.style_keywords,
            keywords.color_preferences,
            keywords.fit_preferences
        );

        let catalog = self.catalog.items().await.map_err(|e| {
            tracing::error!("[{}] Catalog load failed: {}", request_id, e);
            e
        })?;

        let filter = ClothingFilter {
            gender: Some(profile.sex.catalog_gender()),
            ..Default::default()
        };
        let candidates = filter_items(&catalog, &filter);
        tracing::info!("[{}] {} of {} catalog items match", request_id, candidates.len(), catalog.len());

        if candidates.is_empty() {
            return Err(OutfitError::NoItems);
        }

        let ranked = score_and_rank(&candidates, &keywords, &profile);
        let top_matches: Vec<String> = ranked
            .iter()
            .take(self.settings.top_matches)
            .map(|scored| scored.item.id.clone())
            .collect();

        let palette_words = if keywords.style_keywords.is_empty() {
            profile
                .style_description
                .to_lowercase()
                .split_whitespace()
                .take(FALLBACK_PALETTE_WORDS)
                .map(str::to_string)
                .collect()
        } else {
            keywords.style_keywords.clone()
        };

        let shoe_guide = shoe_for(profile.body_type, &profile.style_description, profile.sex);

        // thread_rng is not Send, keep it out of the await points
        let (outfit, palettes) = {
            let mut rng = rand::thread_rng();
            let catalog_shoes = self.settings.shoe_source == ShoeSource::Catalog;
            let mut outfit = select_outfit(&candidates, &profile, &keywords.style_keywords, catalog_shoes, &mut rng);

            let validation = validate_outfit(&outfit);
            if !validation.is_valid {
                tracing::warn!("[{}] Incomplete outfit, missing {:?}", request_id, validation.missing);
                return Err(OutfitError::IncompleteOutfit(validation.missing));
            }

            if outfit.shoe.is_none() {
                let shoe = pick_generated_shoe(&shoe_guide, outfit.dominant_color(), season, &mut rng);
                tracing::debug!("[{}] Generated shoe: {}", request_id, shoe.describe());
                outfit.shoe = Some(ShoeChoice::Generated(shoe));
            }

            let palettes = self.palettes.pick_two_for_season(season, &palette_words, &mut rng);
            (outfit, palettes)
        };

        let summary = prompts::outfit_summary(&outfit);
        tracing::info!("[{}] Outfit selected:\n{}", request_id, summary);

        let ctx = PromptContext {
            profile: &profile,
            measurements: &measurements,
            fits: &fits,
            primary_palette: palettes.primary,
            alternative_palette: palettes.alternative,
            season,
            outfit: &outfit,
            shoe_guide: &shoe_guide,
            date: chrono::Local::now().date_naive(),
        };

        let outfit_description = self.llm.complete(OUTFIT_SYSTEM, &ctx.outfit_prompt()).await.map_err(|e| {
            tracing::error!("[{}] Outfit description failed: {}", request_id, e);
            e
        })?;

        let image_url = match &self.image {
            Some(client) => match client.generate(&ctx.image_prompt(&outfit_description)).await {
                Ok(url) => {
                    tracing::info!("[{}] Image generated", request_id);
                    Some(url)
                }
                Err(e) => {
                    tracing::warn!("[{}] Image generation failed, continuing without image: {}", request_id, e);
                    None
                }
            },
            None => {
                tracing::debug!("[{}] Image API not configured, skipping render", request_id);
                None
            }
        };

        let styling_tips = self.llm.styling_tips(TIPS_SYSTEM, &ctx.styling_tips_prompt()).await.map_err(|e| {
            tracing::error!("[{}] Styling tips failed: {}", request_id, e);
            e
        })?;

        let formatted_response =
            prompts::format_complete_response(&outfit_description, &outfit, &styling_tips, &measurements);

        tracing::info!("[{}] Outfit generation complete", request_id);

        Ok(GenerateOutfitResponse {
            request_id,
            outfit_summary: summary,
            image_url,
            styling_tips,
            primary_palette: palettes.primary.clone(),
            alternative_palette: palettes.alternative.format(false),
            shoe_recommendation: shoe_guide.recommendation.clone(),
            product_links: product_links(&outfit),
            top_matches,
            season: season.code().to_string(),
            formatted_response,
            outfit_description,
            measurements,
            user_profile: profile,
            fits,
            selected_items: outfit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OutfitError::Validation("x".into()).status_code(), 400);
        assert_eq!(OutfitError::NoItems.status_code(), 400);
        assert_eq!(OutfitError::Llm(LlmError::EmptyResponse).status_code(), 502);
        assert_eq!(
            OutfitError::Catalog(CatalogError::MissingDirectory("x".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_missing_field_includes_format_hint() {
        let err = OutfitError::from(ProfileError::MissingField("weight"));
        let message = err.to_string();
        assert!(message.starts_with("Missing required field: weight"));
        assert!(message.contains("Recommended format:"));

        let err = OutfitError::from(ProfileError::Invalid("height: out of range".into()));
        assert_eq!(err.to_string(), "height: out of range");
    }

    #[test]
    fn test_incomplete_outfit_message() {
        let err = OutfitError::IncompleteOutfit(vec![GarmentSlot::Top, GarmentSlot::Pants]);
        assert_eq!(err.to_string(), "Incomplete outfit - missing: top, pants");
        assert_eq!(err.kind(), "incomplete_outfit");
    }
}

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_brand, BodyMeasurements, BodyType, ClothingItem, ColorPalette, FitSummary, Gender,
    GarmentSlot, OutfitSelection, PaletteColor, ParsedInput, Season, Sex, ShoeChoice,
    ShoeDescriptor, StyleKeywords, StyleVibe, UserProfile, MAX_STYLE_WORDS, PLACEHOLDER_COLOR,
};
pub use requests::{CatalogItemsQuery, GenerateOutfitRequest};
pub use responses::{
    BodyTypeInfo, ErrorResponse, GenerateOutfitResponse, HealthResponse, SeasonResponse,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Color stored on catalog items whose source data carries none
pub const PLACEHOLDER_COLOR: &str = "unknown";

/// Maximum number of words accepted in a style description
pub const MAX_STYLE_WORDS: usize = 30;

/// Biological sex used by the measurement formulas and prompt wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Catalog gender tag matching this sex
    pub fn catalog_gender(&self) -> Gender {
        match self {
            Sex::Male => Gender::Man,
            Sex::Female => Gender::Woman,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender tag carried by catalog items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Man,
    Woman,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Man => "man",
            Gender::Woman => "woman",
            Gender::Unisex => "unisex",
        }
    }

    /// Lenient mapping used when loading catalog data; unknown tags become unisex
    pub fn from_catalog(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "man" | "men" | "male" | "m" => Gender::Man,
            "woman" | "women" | "female" | "f" => Gender::Woman,
            _ => Gender::Unisex,
        }
    }

    /// Whether an item tagged `self` can be worn by someone shopping for `wanted`
    pub fn accepts(&self, wanted: Gender) -> bool {
        *self == wanted || *self == Gender::Unisex
    }
}

/// Coarse build classification selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    Slim,
    Athletic,
    Average,
    Muscular,
    Stocky,
    PlusSize,
}

impl BodyType {
    pub const ALL: [BodyType; 6] = [
        BodyType::Slim,
        BodyType::Athletic,
        BodyType::Average,
        BodyType::Muscular,
        BodyType::Stocky,
        BodyType::PlusSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Slim => "slim",
            BodyType::Athletic => "athletic",
            BodyType::Average => "average",
            BodyType::Muscular => "muscular",
            BodyType::Stocky => "stocky",
            BodyType::PlusSize => "plus-size",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BodyType::Slim => "Slim",
            BodyType::Athletic => "Athletic",
            BodyType::Average => "Average",
            BodyType::Muscular => "Muscular",
            BodyType::Stocky => "Stocky",
            BodyType::PlusSize => "Plus Size",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BodyType::Slim => "Lean build, minimal body fat",
            BodyType::Athletic => "Toned, moderate muscle definition",
            BodyType::Average => "Balanced proportions",
            BodyType::Muscular => "Heavily developed muscles",
            BodyType::Stocky => "Solid, compact build",
            BodyType::PlusSize => "Fuller figure with curves",
        }
    }

    /// Parse a body type, falling back to `Average` for anything unrecognised
    pub fn parse_or_average(raw: &str) -> Self {
        raw.parse().unwrap_or(BodyType::Average)
    }
}

impl FromStr for BodyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        BodyType::ALL
            .iter()
            .copied()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "Invalid body type '{}'. Must be one of: {}",
                    s,
                    BodyType::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>().join(", ")
                )
            })
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical garment slot a catalog category maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentSlot {
    Top,
    Pants,
    Shoe,
    Layer,
}

impl GarmentSlot {
    pub const ALL: [GarmentSlot; 4] = [
        GarmentSlot::Top,
        GarmentSlot::Pants,
        GarmentSlot::Shoe,
        GarmentSlot::Layer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentSlot::Top => "top",
            GarmentSlot::Pants => "pants",
            GarmentSlot::Shoe => "shoe",
            GarmentSlot::Layer => "layer",
        }
    }
}

impl fmt::Display for GarmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary style classification derived from the free-text description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleVibe {
    Elegant,
    Casual,
}

impl StyleVibe {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleVibe::Elegant => "elegant",
            StyleVibe::Casual => "casual",
        }
    }

    /// Parse a vibe, falling back to `Casual` for anything unrecognised
    pub fn parse_or_casual(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "elegant" => StyleVibe::Elegant,
            _ => StyleVibe::Casual,
        }
    }
}

/// Fashion season derived from the calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "FW")]
    FallWinter,
    #[serde(rename = "SS")]
    SpringSummer,
}

impl Season {
    /// FW covers September through February, SS covers March through August
    pub fn from_month(month: u32) -> Self {
        if month >= 9 || month <= 2 {
            Season::FallWinter
        } else {
            Season::SpringSummer
        }
    }

    pub fn current() -> Self {
        use chrono::Datelike;
        Self::from_month(chrono::Local::now().month())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Season::FallWinter => "FW",
            Season::SpringSummer => "SS",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::FallWinter => "Fall/Winter",
            Season::SpringSummer => "Spring/Summer",
        }
    }

    pub fn months(&self) -> &'static str {
        match self {
            Season::FallWinter => "September - February",
            Season::SpringSummer => "March - August",
        }
    }

    pub fn styling_description(&self) -> &'static str {
        match self {
            Season::FallWinter => {
                "Fall/Winter: Layering, rich textures (wool, cashmere, leather), \
                 deeper tones, structured silhouettes."
            }
            Season::SpringSummer => {
                "Spring/Summer: Breathable fabrics (linen, cotton, silk), lighter colors, \
                 relaxed fits, minimal layering."
            }
        }
    }

    pub fn fabrics(&self) -> &'static [&'static str] {
        match self {
            Season::FallWinter => &["wool", "cashmere", "leather", "denim"],
            Season::SpringSummer => &["linen", "cotton", "silk", "chambray"],
        }
    }

    pub fn outerwear_required(&self) -> bool {
        matches!(self, Season::FallWinter)
    }
}

/// A normalised clothing item from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,
    pub brand: String,
    pub category: String,
    pub gender: Gender,
    pub colors: Vec<String>,
    pub style: String,
    #[serde(rename = "price_eur")]
    pub price_eur: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ClothingItem {
    /// Colors that came from the source data, excluding the placeholder
    pub fn known_colors(&self) -> impl Iterator<Item = &str> {
        self.colors
            .iter()
            .map(String::as_str)
            .filter(|c| *c != PLACEHOLDER_COLOR)
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.known_colors().next()
    }

    /// Brand lower-cased with spaces and hyphens folded to underscores
    pub fn normalized_brand(&self) -> String {
        normalize_brand(&self.brand)
    }
}

/// Lower-case a brand and fold spaces and hyphens to underscores
pub fn normalize_brand(brand: &str) -> String {
    brand.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Best-effort result of parsing the free-text user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInput {
    pub sex: Sex,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    pub age: Option<u32>,
    pub shoe_size: Option<u32>,
    /// Body type literal found in the message, if any
    pub body_type: Option<BodyType>,
    pub favorite_brands: Vec<String>,
    pub style_description: String,
}

/// Validated user profile for a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    pub sex: Sex,
    #[validate(range(min = 140, max = 220, message = "Height must be between 140-220cm"))]
    pub height: u32,
    #[validate(range(min = 40, max = 200, message = "Weight must be between 40-200kg"))]
    pub weight: u32,
    #[validate(range(min = 10, max = 100, message = "Age must be between 10-100"))]
    pub age: u32,
    #[validate(range(min = 35, max = 50, message = "Shoe size must be between 35-50 EU"))]
    pub shoe_size: u32,
    pub body_type: BodyType,
    #[validate(length(max = 3, message = "At most 3 favorite brands are allowed"))]
    pub favorite_brands: Vec<String>,
    #[validate(custom(function = "validate_style_length"))]
    pub style_description: String,
}

fn validate_style_length(description: &str) -> Result<(), ValidationError> {
    let words = description.split_whitespace().count();
    if words > MAX_STYLE_WORDS {
        let mut err = ValidationError::new("too_long");
        err.message = Some(
            format!(
                "Style description too long ({} words). Max {} words.",
                words, MAX_STYLE_WORDS
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Anthropometric estimates derived from height, weight and sex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    pub height: u32,
    pub weight: u32,
    pub sex: Sex,
    pub chest_circumference: f64,
    pub waist_circumference: f64,
    pub hip_circumference: f64,
    pub shoulder_width: f64,
    pub leg_length: f64,
    pub arm_length: f64,
    pub shoulder_hip_ratio: String,
    pub chest_waist_ratio: String,
    pub leg_length_ratio: String,
    pub silhouette_gray: i32,
    pub bmi: f64,
}

/// Keywords extracted from the style description by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleKeywords {
    #[serde(default)]
    pub style_keywords: Vec<String>,
    #[serde(default)]
    pub color_preferences: Vec<String>,
    #[serde(default)]
    pub fit_preferences: Vec<String>,
    #[serde(default)]
    pub season_appropriate: Vec<String>,
}

impl Default for StyleKeywords {
    fn default() -> Self {
        Self {
            style_keywords: vec!["casual".to_string()],
            color_preferences: vec!["black".to_string()],
            fit_preferences: vec!["regular".to_string()],
            season_appropriate: vec![],
        }
    }
}

/// Fit descriptors chosen for the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub vibe: StyleVibe,
    pub pants: String,
    pub tops: String,
    pub size_multiplier: String,
}

/// AI-generated shoe used when the catalog has no suitable footwear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoeDescriptor {
    pub shoe_type: String,
    pub material: String,
    pub color: String,
}

impl ShoeDescriptor {
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.color, self.material, self.shoe_type)
    }
}

/// Shoe slot content: a catalog item or a generated descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ShoeChoice {
    Catalog(ClothingItem),
    Generated(ShoeDescriptor),
}

/// One pick per garment slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitSelection {
    pub top: Option<ClothingItem>,
    pub pants: Option<ClothingItem>,
    pub shoe: Option<ShoeChoice>,
    pub layer: Option<ClothingItem>,
}

impl OutfitSelection {
    /// Catalog item occupying a slot, if any
    pub fn item(&self, slot: GarmentSlot) -> Option<&ClothingItem> {
        match slot {
            GarmentSlot::Top => self.top.as_ref(),
            GarmentSlot::Pants => self.pants.as_ref(),
            GarmentSlot::Layer => self.layer.as_ref(),
            GarmentSlot::Shoe => match &self.shoe {
                Some(ShoeChoice::Catalog(item)) => Some(item),
                _ => None,
            },
        }
    }

    /// First known color of the top, then pants, then layer
    pub fn dominant_color(&self) -> Option<&str> {
        [&self.top, &self.pants, &self.layer]
            .into_iter()
            .flatten()
            .find_map(|item| item.primary_color())
    }
}

/// Named three-color palette tied to a season
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPalette {
    pub key: &'static str,
    pub name: &'static str,
    pub colors: [PaletteColor; 3],
    pub season: Season,
    pub mood: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

impl ColorPalette {
    /// `Name: Color (#hex), ...` or `Name: Color, ...`
    pub fn format(&self, include_hex: bool) -> String {
        let colors = self
            .colors
            .iter()
            .map(|c| {
                if include_hex {
                    format!("{} ({})", c.name, c.hex)
                } else {
                    c.name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: {}", self.name, colors)
    }
}

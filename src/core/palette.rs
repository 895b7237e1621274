use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use crate::models::{ColorPalette, PaletteColor, Season};

macro_rules! palette {
    ($key:expr, $name:expr, [$(($cn:expr, $hex:expr)),+], $season:expr, $mood:expr, [$($kw:expr),+]) => {
        ColorPalette {
            key: $key,
            name: $name,
            colors: [$(PaletteColor { name: $cn, hex: $hex }),+],
            season: $season,
            mood: $mood,
            keywords: &[$($kw),+],
        }
    };
}

use Season::{FallWinter as FW, SpringSummer as SS};

/// Sanzo Wada inspired palettes, 15 per season
pub static PALETTES: [ColorPalette; 30] = [
    palette!(
        "FW_CLASSIC_NOIR",
        "Classic Noir",
        [("Charcoal", "#36454F"), ("Deep Navy", "#000080"), ("Burgundy", "#800020")],
        FW,
        "classic",
        ["elegant", "formal", "sophisticated", "business", "minimal", "professional"]
    ),
    palette!(
        "FW_AUTUMN_EARTH",
        "Autumn Earth",
        [("Rust Orange", "#B7410E"), ("Olive Green", "#556B2F"), ("Burnt Sienna", "#E97451")],
        FW,
        "warm",
        ["casual", "natural", "vintage", "bohemian", "earthy", "outdoor"]
    ),
    palette!(
        "FW_WINTER_FOREST",
        "Winter Forest",
        [("Forest Green", "#228B22"), ("Chocolate Brown", "#3B2414"), ("Night Rider", "#2C2C2C")],
        FW,
        "outdoor",
        ["outdoor", "rugged", "natural", "adventure", "hiking", "camping"]
    ),
    palette!(
        "FW_LUXE_JEWEL",
        "Luxe Jewel",
        [("Emerald", "#50C878"), ("Royal Purple", "#7851A9"), ("Gold", "#FFD700")],
        FW,
        "bold",
        ["luxury", "bold", "party", "evening", "statement", "glamorous"]
    ),
    palette!(
        "FW_URBAN_STEEL",
        "Urban Steel",
        [("Graphite", "#383428"), ("Steel Blue", "#4682B4"), ("Silver", "#C0C0C0")],
        FW,
        "modern",
        ["urban", "modern", "tech", "minimalist", "industrial", "contemporary"]
    ),
    palette!(
        "FW_COZY_NEUTRAL",
        "Cozy Neutral",
        [("Camel", "#C19A6B"), ("Cream", "#FFFDD0"), ("Taupe", "#483C32")],
        FW,
        "neutral",
        ["cozy", "comfortable", "neutral", "versatile", "timeless", "soft"]
    ),
    palette!(
        "FW_MIDNIGHT_DEPTH",
        "Midnight Depth",
        [("Midnight Blue", "#191970"), ("Slate Gray", "#708090"), ("Bone White", "#F9F6EE")],
        FW,
        "sophisticated",
        ["elegant", "refined", "dark", "mysterious", "sophisticated", "evening"]
    ),
    palette!(
        "FW_TERRACOTTA_WARMTH",
        "Terracotta Warmth",
        [("Terracotta", "#E2725B"), ("Mustard", "#FFDB58"), ("Clay Brown", "#B66325")],
        FW,
        "warm",
        ["warm", "inviting", "rustic", "mediterranean", "cozy", "homey"]
    ),
    palette!(
        "FW_CHARCOAL_REFINED",
        "Charcoal Refined",
        [("Charcoal", "#36454F"), ("Ash Gray", "#B2BEB5"), ("Ivory", "#FFFFF0")],
        FW,
        "minimal",
        ["minimal", "clean", "refined", "professional", "sleek", "modern"]
    ),
    palette!(
        "FW_BURGUNDY_HERITAGE",
        "Burgundy Heritage",
        [("Burgundy", "#800020"), ("Navy", "#000080"), ("Beige", "#F5F5DC")],
        FW,
        "classic",
        ["classic", "heritage", "traditional", "ivy", "preppy", "collegiate"]
    ),
    palette!(
        "FW_MILITARY_OLIVE",
        "Military Olive",
        [("Olive Drab", "#6B8E23"), ("Khaki", "#C3B091"), ("Black", "#000000")],
        FW,
        "utilitarian",
        ["military", "utilitarian", "tactical", "practical", "rugged", "workwear"]
    ),
    palette!(
        "FW_ESPRESSO_TONES",
        "Espresso Tones",
        [("Espresso", "#4E312D"), ("Latte", "#C9A88F"), ("Cream", "#FFFDD0")],
        FW,
        "warm",
        ["warm", "coffee", "neutral", "comfortable", "rich", "inviting"]
    ),
    palette!(
        "FW_PLUM_TWILIGHT",
        "Plum Twilight",
        [("Plum", "#8E4585"), ("Charcoal", "#36454F"), ("Mauve", "#E0B0FF")],
        FW,
        "artistic",
        ["artistic", "creative", "unique", "expressive", "bold", "unconventional"]
    ),
    palette!(
        "FW_TEAL_DEPTH",
        "Teal Depth",
        [("Teal", "#008080"), ("Gray", "#808080"), ("Cream", "#FFFDD0")],
        FW,
        "fresh",
        ["fresh", "modern", "cool", "balanced", "calm", "sophisticated"]
    ),
    palette!(
        "FW_MONOCHROME_EDGE",
        "Monochrome Edge",
        [("Black", "#000000"), ("White", "#FFFFFF"), ("Concrete Gray", "#95918E")],
        FW,
        "stark",
        ["minimal", "stark", "bold", "graphic", "modern", "architectural"]
    ),
    palette!(
        "SS_COASTAL_BREEZE",
        "Coastal Breeze",
        [("Sky Blue", "#87CEEB"), ("Sandy Beige", "#F5DEB3"), ("Seafoam", "#93E9BE")],
        SS,
        "fresh",
        ["beach", "vacation", "relaxed", "coastal", "light", "airy"]
    ),
    palette!(
        "SS_PASTEL_DREAM",
        "Pastel Dream",
        [("Blush Pink", "#FFB6C1"), ("Lavender", "#E6E6FA"), ("Mint", "#98FF98")],
        SS,
        "soft",
        ["romantic", "soft", "feminine", "gentle", "dreamy", "delicate"]
    ),
    palette!(
        "SS_CITRUS_POP",
        "Citrus Pop",
        [("Lemon Yellow", "#FFF44F"), ("Coral", "#FF7F50"), ("Lime", "#BFFF00")],
        SS,
        "vibrant",
        ["bright", "energetic", "fun", "playful", "bold", "cheerful"]
    ),
    palette!(
        "SS_MINIMALIST_WHITE",
        "Minimalist White",
        [("Pure White", "#FFFFFF"), ("Light Gray", "#D3D3D3"), ("Soft Ivory", "#FFFFF0")],
        SS,
        "minimal",
        ["minimal", "clean", "simple", "elegant", "modern", "pure"]
    ),
    palette!(
        "SS_GARDEN_BLOOM",
        "Garden Bloom",
        [("Rose Pink", "#FF007F"), ("Sage Green", "#9DC183"), ("Buttercream", "#FFFACD")],
        SS,
        "natural",
        ["floral", "garden", "natural", "fresh", "spring", "botanical"]
    ),
    palette!(
        "SS_TROPICAL_SUNSET",
        "Tropical Sunset",
        [("Tangerine", "#F28500"), ("Turquoise", "#40E0D0"), ("Fuchsia", "#FF00FF")],
        SS,
        "bold",
        ["tropical", "vacation", "sunset", "bold", "exotic", "vibrant"]
    ),
    palette!(
        "SS_NAUTICAL_STRIPE",
        "Nautical Stripe",
        [("Navy Blue", "#000080"), ("White", "#FFFFFF"), ("Red", "#FF0000")],
        SS,
        "classic",
        ["nautical", "maritime", "classic", "preppy", "sailing", "beach"]
    ),
    palette!(
        "SS_LINEN_NATURAL",
        "Linen Natural",
        [("Natural Linen", "#FAF0E6"), ("Sand", "#C2B280"), ("Stone Gray", "#928E85")],
        SS,
        "neutral",
        ["natural", "neutral", "organic", "minimal", "relaxed", "earthy"]
    ),
    palette!(
        "SS_AQUA_REFRESH",
        "Aqua Refresh",
        [("Aquamarine", "#7FFFD4"), ("White", "#FFFFFF"), ("Periwinkle", "#CCCCFF")],
        SS,
        "cool",
        ["cool", "refreshing", "water", "clean", "bright", "summery"]
    ),
    palette!(
        "SS_PEACH_SORBET",
        "Peach Sorbet",
        [("Peach", "#FFCBA4"), ("Cream", "#FFFDD0"), ("Light Pink", "#FFB6C1")],
        SS,
        "soft",
        ["soft", "sweet", "gentle", "feminine", "warm", "delicate"]
    ),
    palette!(
        "SS_MINT_FRESH",
        "Mint Fresh",
        [("Mint Green", "#98FF98"), ("White", "#FFFFFF"), ("Light Teal", "#AFEEEE")],
        SS,
        "fresh",
        ["fresh", "clean", "cool", "minty", "light", "breezy"]
    ),
    palette!(
        "SS_SUNSET_SAND",
        "Sunset Sand",
        [("Burnt Orange", "#CC5500"), ("Sand", "#C2B280"), ("Sky Blue", "#87CEEB")],
        SS,
        "warm",
        ["sunset", "beach", "warm", "golden", "vacation", "desert"]
    ),
    palette!(
        "SS_LAVENDER_FIELD",
        "Lavender Field",
        [("Lavender", "#E6E6FA"), ("Sage", "#BCB88A"), ("Cream", "#FFFDD0")],
        SS,
        "serene",
        ["serene", "calm", "peaceful", "provence", "floral", "herbal"]
    ),
    palette!(
        "SS_OCEAN_DEPTH",
        "Ocean Depth",
        [("Deep Teal", "#00555A"), ("Foam White", "#F8F8FF"), ("Sand", "#C2B280")],
        SS,
        "sophisticated",
        ["ocean", "sophisticated", "deep", "elegant", "coastal", "refined"]
    ),
    palette!(
        "SS_PAPAYA_SUNRISE",
        "Papaya Sunrise",
        [("Papaya", "#FFEFD5"), ("Coral", "#FF7F50"), ("Ivory", "#FFFFF0")],
        SS,
        "warm",
        ["tropical", "warm", "sunrise", "cheerful", "bright", "fruity"]
    ),
];

/// Palettes for one season, in table order
pub fn palettes_for_season(season: Season) -> Vec<&'static ColorPalette> {
    PALETTES.iter().filter(|p| p.season == season).collect()
}

const EXACT_MATCH_POINTS: u32 = 3;
const PARTIAL_MATCH_POINTS: u32 = 1;
const MOOD_BONUS_POINTS: u32 = 2;
const MIN_PARTIAL_LEN: usize = 3;

/// Keyword overlap score of a palette
///
/// Each style keyword earns its best match: an exact palette keyword scores
/// higher than a substring overlap. The mood appearing in the joined
/// keywords adds a bonus.
pub fn score_palette(palette: &ColorPalette, style_keywords: &[String]) -> u32 {
    let keywords: Vec<String> = style_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut score: u32 = keywords
        .iter()
        .map(|kw| {
            palette
                .keywords
                .iter()
                .map(|pk| {
                    if kw == pk {
                        EXACT_MATCH_POINTS
                    } else if kw.len() >= MIN_PARTIAL_LEN && (kw.contains(pk) || pk.contains(kw.as_str())) {
                        PARTIAL_MATCH_POINTS
                    } else {
                        0
                    }
                })
                .max()
                .unwrap_or(0)
        })
        .sum();

    if keywords.join(" ").contains(palette.mood) {
        score += MOOD_BONUS_POINTS;
    }

    score
}

/// Primary palette for the outfit and an alternative for the tips
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PalettePair {
    pub primary: &'static ColorPalette,
    pub alternative: &'static ColorPalette,
}

/// Palette picker with a bounded memory of recent primary picks
///
/// Recent picks are skipped as primary candidates so consecutive requests
/// do not keep landing on the same palette. Shared across requests.
#[derive(Debug)]
pub struct PaletteSelector {
    recent: Mutex<VecDeque<&'static str>>,
    window: usize,
}

pub const DEFAULT_HISTORY_WINDOW: usize = 5;

impl PaletteSelector {
    pub fn new(window: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(window)),
            window,
        }
    }

    /// Keys of the most recent primary picks, oldest first
    pub fn recent(&self) -> Vec<&'static str> {
        self.recent.lock().iter().copied().collect()
    }

    /// Pick for the current season using the thread RNG
    pub fn pick_two(&self, style_keywords: &[String]) -> PalettePair {
        self.pick_two_for_season(Season::current(), style_keywords, &mut rand::thread_rng())
    }

    pub fn pick_two_for_season<R: Rng + ?Sized>(
        &self,
        season: Season,
        style_keywords: &[String],
        rng: &mut R,
    ) -> PalettePair {
        let seasonal = palettes_for_season(season);
        let mut recent = self.recent.lock();

        let fresh: Vec<&'static ColorPalette> = seasonal
            .iter()
            .copied()
            .filter(|p| !recent.contains(&p.key))
            .collect();
        let candidates = if fresh.is_empty() { &seasonal } else { &fresh };

        let primary = best_match(candidates, style_keywords)
            .or_else(|| candidates.choose(rng).copied())
            .unwrap_or(&PALETTES[0]);

        if self.window > 0 {
            recent.push_back(primary.key);
            while recent.len() > self.window {
                recent.pop_front();
            }
        }
        drop(recent);

        let different_mood: Vec<&'static ColorPalette> = seasonal
            .iter()
            .copied()
            .filter(|p| p.mood != primary.mood)
            .collect();
        let alternative = different_mood
            .choose(rng)
            .copied()
            .or_else(|| seasonal.iter().copied().find(|p| p.name != primary.name))
            .unwrap_or(primary);

        tracing::debug!(
            "Palettes for {}: primary={}, alternative={}",
            season.code(),
            primary.name,
            alternative.name
        );

        PalettePair { primary, alternative }
    }
}

impl Default for PaletteSelector {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

/// Highest scoring palette, first in order on ties; `None` when nothing scores
fn best_match(
    candidates: &[&'static ColorPalette],
    style_keywords: &[String],
) -> Option<&'static ColorPalette> {
    let mut best: Option<(&'static ColorPalette, u32)> = None;
    for palette in candidates {
        let score = score_palette(palette, style_keywords);
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((palette, score));
        }
    }
    best.map(|(p, _)| p)
}

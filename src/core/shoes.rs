use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use crate::core::fit_rules::determine_style_vibe;
use crate::models::{BodyType, Season, Sex, ShoeDescriptor, StyleVibe};

/// Occasion the shoe table is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoeOccasion {
    Elegant,
    Casual,
    Sporty,
}

const SPORTY_KEYWORDS: [&str; 6] = ["sport", "athleisure", "gym", "running", "training", "active"];

impl ShoeOccasion {
    /// Sporty wins when its keywords appear, otherwise follow the style vibe
    pub fn classify(style_description: &str) -> Self {
        let text = style_description.to_lowercase();
        if SPORTY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return ShoeOccasion::Sporty;
        }
        match determine_style_vibe(&text) {
            StyleVibe::Elegant => ShoeOccasion::Elegant,
            StyleVibe::Casual => ShoeOccasion::Casual,
        }
    }
}

/// Shoe guidance for a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoeGuide {
    pub occasion: ShoeOccasion,
    pub profile: &'static str,
    pub avoid: &'static str,
    pub recommendation: String,
    pub candidate_types: Vec<&'static str>,
    pub materials: &'static [&'static str],
    pub colors: &'static [&'static str],
}

struct ShoeStyle {
    types: &'static [&'static str],
    materials: &'static [&'static str],
    colors: &'static [&'static str],
}

fn body_profile(body_type: BodyType) -> (&'static str, &'static str) {
    match body_type {
        BodyType::Slim => (
            "sleek, low-profile silhouette with a slim sole",
            "chunky platform soles that overwhelm a narrow frame",
        ),
        BodyType::Athletic => (
            "balanced mid-profile shoe with a moderate sole",
            "overly narrow pointed toes",
        ),
        BodyType::Average => (
            "versatile mid-profile shoe",
            "extreme proportions in either direction",
        ),
        BodyType::Muscular => (
            "substantial shoe with a sturdy sole to balance a broad upper body",
            "very slim, delicate shoes",
        ),
        BodyType::Stocky => (
            "streamlined shoe with a slightly elongated toe and low heel",
            "bulky high-tops that shorten the leg line",
        ),
        BodyType::PlusSize => (
            "supportive shoe with a solid, medium-width sole",
            "very thin soles and narrow straps",
        ),
    }
}

fn shoe_style(occasion: ShoeOccasion, sex: Sex) -> ShoeStyle {
    match (occasion, sex) {
        (ShoeOccasion::Elegant, Sex::Male) => ShoeStyle {
            types: &["oxfords", "loafers", "derby shoes", "chelsea boots"],
            materials: &["polished leather", "suede"],
            colors: &["black", "dark brown", "burgundy"],
        },
        (ShoeOccasion::Casual, Sex::Male) => ShoeStyle {
            types: &["sneakers", "loafers", "desert boots"],
            materials: &["leather", "suede", "canvas"],
            colors: &["white", "navy", "tan", "black"],
        },
        (ShoeOccasion::Sporty, Sex::Male) => ShoeStyle {
            types: &["running sneakers", "trainers", "high-top sneakers"],
            materials: &["mesh", "knit", "leather"],
            colors: &["white", "black", "gray"],
        },
        (ShoeOccasion::Elegant, Sex::Female) => ShoeStyle {
            types: &["pumps", "pointed flats", "ankle boots", "block heels"],
            materials: &["patent leather", "leather", "suede"],
            colors: &["black", "nude", "burgundy"],
        },
        (ShoeOccasion::Casual, Sex::Female) => ShoeStyle {
            types: &["sneakers", "ballet flats", "loafers", "ankle boots"],
            materials: &["leather", "canvas", "suede"],
            colors: &["white", "beige", "black", "tan"],
        },
        (ShoeOccasion::Sporty, Sex::Female) => ShoeStyle {
            types: &["running sneakers", "trainers", "platform sneakers"],
            materials: &["mesh", "knit", "leather"],
            colors: &["white", "pink", "gray"],
        },
    }
}

/// Shoe profile, things to avoid and candidate types/materials/colors
pub fn shoe_for(body_type: BodyType, style_description: &str, sex: Sex) -> ShoeGuide {
    let occasion = ShoeOccasion::classify(style_description);
    let (profile, avoid) = body_profile(body_type);
    let style = shoe_style(occasion, sex);

    let recommendation = format!(
        "Go for {} or {} in {}: a {}. Avoid {}.",
        style.types[0],
        style.types[1],
        style.materials[0],
        profile,
        avoid
    );

    ShoeGuide {
        occasion,
        profile,
        avoid,
        recommendation,
        candidate_types: style.types.to_vec(),
        materials: style.materials,
        colors: style.colors,
    }
}

const WARM_WEATHER_MATERIALS: [&str; 3] = ["canvas", "mesh", "knit"];

/// Shoe colors that pair with a dominant outfit color, best first
fn color_pairings(dominant: &str) -> &'static [&'static str] {
    const PAIRINGS: [(&[&str], &[&str]); 9] = [
        (&["black"], &["black", "white", "gray"]),
        (&["navy"], &["white", "tan", "dark brown", "navy", "black"]),
        (&["white", "ivory"], &["white", "black", "beige", "tan"]),
        (&["gray", "grey", "charcoal"], &["black", "white", "burgundy"]),
        (&["beige", "camel", "khaki", "tan", "sand", "cream"], &["dark brown", "tan", "white", "beige"]),
        (&["brown"], &["dark brown", "tan", "beige"]),
        (&["green", "olive"], &["dark brown", "tan", "black"]),
        (&["red", "burgundy", "pink"], &["black", "burgundy", "nude"]),
        (&["blue"], &["white", "tan", "navy"]),
    ];

    let dominant = dominant.to_lowercase();
    PAIRINGS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| dominant.contains(k)))
        .map(|(_, colors)| *colors)
        .unwrap_or(&[])
}

/// Pick a concrete shoe when the catalog cannot supply one
///
/// In Fall/Winter sneaker-type shoes are swapped for boots and warm-weather
/// materials are dropped when alternatives exist.
pub fn pick_generated_shoe<R: Rng + ?Sized>(
    guide: &ShoeGuide,
    dominant_color: Option<&str>,
    season: Season,
    rng: &mut R,
) -> ShoeDescriptor {
    let mut types: Vec<&str> = guide
        .candidate_types
        .iter()
        .map(|t| {
            if season == Season::FallWinter && (t.contains("sneaker") || t.contains("trainer")) {
                "lace-up boots"
            } else {
                *t
            }
        })
        .collect();
    types.dedup();

    let shoe_type = types.choose(rng).copied().unwrap_or("sneakers");

    let seasonal: Vec<&str> = guide
        .materials
        .iter()
        .copied()
        .filter(|m| season == Season::SpringSummer || !WARM_WEATHER_MATERIALS.contains(m))
        .collect();
    let material = if seasonal.is_empty() {
        guide.materials.first().copied().unwrap_or("leather")
    } else {
        seasonal[0]
    };

    let color = dominant_color
        .and_then(|dominant| {
            color_pairings(dominant)
                .iter()
                .find(|c| guide.colors.contains(c))
                .copied()
                .or_else(|| {
                    let dominant = dominant.to_lowercase();
                    guide.colors.iter().copied().find(|c| dominant.contains(c))
                })
        })
        .or_else(|| guide.colors.choose(rng).copied())
        .unwrap_or("black");

    ShoeDescriptor {
        shoe_type: shoe_type.to_string(),
        material: material.to_string(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_occasion_classification() {
        assert_eq!(ShoeOccasion::classify("sporty gym look"), ShoeOccasion::Sporty);
        assert_eq!(ShoeOccasion::classify("formal business"), ShoeOccasion::Elegant);
        assert_eq!(ShoeOccasion::classify("streetwear"), ShoeOccasion::Casual);
    }

    #[test]
    fn test_shoe_for_female_elegant() {
        let guide = shoe_for(BodyType::Slim, "elegant evening", Sex::Female);
        assert_eq!(guide.occasion, ShoeOccasion::Elegant);
        assert!(guide.candidate_types.contains(&"pumps"));
        assert!(guide.recommendation.contains("chunky platform"));
    }

    #[test]
    fn test_generated_shoe_uses_boots_in_winter() {
        let guide = shoe_for(BodyType::Average, "running sporty", Sex::Male);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let shoe = pick_generated_shoe(&guide, Some("navy"), Season::FallWinter, &mut rng);
            assert!(!shoe.shoe_type.contains("sneaker"));
            assert!(!shoe.shoe_type.contains("trainer"));
            assert_eq!(shoe.material, "leather");
        }
    }

    #[test]
    fn test_generated_shoe_pairs_color() {
        let guide = shoe_for(BodyType::Average, "casual", Sex::Male);
        let mut rng = StdRng::seed_from_u64(1);
        let shoe = pick_generated_shoe(&guide, Some("Navy"), Season::SpringSummer, &mut rng);
        assert_eq!(shoe.color, "white");
        assert_eq!(shoe.material, "leather");
    }
}

use chrono::NaiveDate;
use crate::core::fit_rules::fit_notes;
use crate::core::shoes::ShoeGuide;
use crate::models::{
    BodyMeasurements, BodyType, ColorPalette, FitSummary, GarmentSlot, OutfitSelection, Season,
    Sex, ShoeChoice, StyleVibe, UserProfile,
};

/// Longest style description slice quoted in the outfit prompt
const STYLE_EXCERPT_CHARS: usize = 80;

const SHOE_WORDS: [&str; 5] = ["sneakers", "boots", "loafers", "oxfords", "shoes"];

pub const STYLE_EXTRACTION_SYSTEM: &str =
    "You are a fashion AI that extracts semantic keywords. Return ONLY valid JSON, no markdown, no extra text.";

pub const OUTFIT_SYSTEM: &str =
    "You are a professional fashion stylist. Describe outfits precisely, naming an exact color for every garment.";

pub const TIPS_SYSTEM: &str = "Fashion stylist. Concise, practical advice. Max 50 words.";

/// Everything a prompt may draw on for one request
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub profile: &'a UserProfile,
    pub measurements: &'a BodyMeasurements,
    pub fits: &'a FitSummary,
    pub primary_palette: &'a ColorPalette,
    pub alternative_palette: &'a ColorPalette,
    pub season: Season,
    pub outfit: &'a OutfitSelection,
    pub shoe_guide: &'a ShoeGuide,
    pub date: NaiveDate,
}

/// Prompt asking for the keyword JSON; needs only the profile and season
pub fn style_extraction_prompt(profile: &UserProfile, season: Season) -> String {
    format!(
        "Extract fashion search keywords from this client profile.\n\
         \n\
         CLIENT: {age}yo {sex}, {body_type}\n\
         SEASON: {season} ({season_name})\n\
         STYLE: {style}\n\
         BRANDS: {brands}\n\
         \n\
         Return JSON with exactly these keys:\n\
         {{\"style_keywords\": [..], \"color_preferences\": [..], \"fit_preferences\": [..], \"season_appropriate\": [..]}}\n\
         Use short lower-case words. 3-6 entries per list.",
        age = profile.age,
        sex = profile.sex,
        body_type = profile.body_type,
        season = season.code(),
        season_name = season.name(),
        style = profile.style_description,
        brands = brands_or_none(&profile.favorite_brands),
    )
}

fn brands_or_none(brands: &[String]) -> String {
    if brands.is_empty() {
        "None".to_string()
    } else {
        brands.join(", ")
    }
}

pub fn body_visual_description(height: u32, weight: u32, body_type: BodyType, sex: Sex) -> String {
    let meters = height as f64 / 100.0;
    let bmi = weight as f64 / (meters * meters);
    let stats = format!("{}cm, {}kg, BMI {:.1}", height, weight, bmi);

    let mut description = match body_type {
        BodyType::Slim => format!("Lean {} frame ({}). Narrow shoulders, minimal body fat, thin limbs.", sex, stats),
        BodyType::Average => format!("Balanced {} build ({}). Standard proportions, moderate frame.", sex, stats),
        BodyType::Athletic => format!("Athletic {} build ({}). Defined muscles, V-shaped torso, lean.", sex, stats),
        BodyType::Muscular => format!("Muscular {} build ({}). Broad shoulders, developed chest, thick limbs.", sex, stats),
        BodyType::Stocky => format!("Stocky {} build ({}). Solid frame, muscle with fat layer, broad torso.", sex, stats),
        BodyType::PlusSize => format!("Plus-size {} ({}). Fuller figure, soft contours.", sex, stats),
    };

    if body_type == BodyType::PlusSize {
        description.push_str(match sex {
            Sex::Female => " Fat distributed in hips, thighs (thicker legs), and bust. Pear or hourglass shape.",
            Sex::Male => " Fat concentrated in stomach area (belly), chest, and face. Apple shape with protruding abdomen.",
        });
    }

    description
}

pub fn body_shape_note(body_type: BodyType, sex: Sex) -> &'static str {
    match (body_type, sex) {
        (BodyType::PlusSize, Sex::Female) => "CRITICAL: Thicker legs (fat in thighs), wider hips, fuller figure",
        (BodyType::PlusSize, Sex::Male) => {
            "CRITICAL: Protruding stomach (belly fat), broader midsection, rounded torso"
        }
        _ => "Standard proportions for body type",
    }
}

pub fn layering_instruction(season: Season, vibe: StyleVibe) -> &'static str {
    match (season, vibe) {
        (Season::FallWinter, StyleVibe::Elegant) => {
            "LAYER: \"[COLOR] [fabric] blazer/coat\" (MANDATORY for F/W)"
        }
        (Season::FallWinter, StyleVibe::Casual) => "LAYER: \"[COLOR] [fabric] jacket\" (MANDATORY for F/W)",
        (Season::SpringSummer, _) => "OUTERWEAR: Optional light jacket if desired",
    }
}

pub fn accessories(age: u32, vibe: StyleVibe) -> &'static str {
    match (age < 20, vibe) {
        (true, StyleVibe::Elegant) => "Watch, belt only",
        (true, StyleVibe::Casual) => "Minimal accessories",
        (false, _) => "Watch, belt, optional tie (if elegant)",
    }
}

/// Word preceding the first shoe word in the description, capitalised
pub fn extract_shoe_color(outfit_description: &str) -> String {
    let lowered = outfit_description.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    words
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, word)| SHOE_WORDS.iter().any(|shoe| word.contains(shoe)))
        .map(|(i, _)| capitalize(words[i - 1]))
        .unwrap_or_else(|| "Black".to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Zara` / `Pull And Bear` style title case with underscores as spaces
fn title_case(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .map(|w| capitalize(&w.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// One line per selected catalog piece, fed into the outfit prompt
fn selected_pieces(outfit: &OutfitSelection) -> String {
    let mut lines = Vec::new();
    for slot in GarmentSlot::ALL {
        if let Some(item) = outfit.item(slot) {
            lines.push(format!(
                "- {}: {} {} ({})",
                slot.as_str().to_uppercase(),
                item.brand,
                title_case(&item.category),
                item.known_colors().collect::<Vec<_>>().join(", ")
            ));
        } else if slot == GarmentSlot::Shoe {
            if let Some(ShoeChoice::Generated(shoe)) = &outfit.shoe {
                lines.push(format!("- SHOE: {}", shoe.describe()));
            }
        }
    }
    if lines.is_empty() {
        "- (none)".to_string()
    } else {
        lines.join("\n")
    }
}

impl<'a> PromptContext<'a> {
    pub fn outfit_prompt(&self) -> String {
        let p = self.profile;
        let female_note = match p.sex {
            Sex::Female => "FEMALE: Can use dresses, skirts, blouses, heels, flats",
            Sex::Male => "",
        };

        format!(
            "Generate outfit with EXPLICIT colors.\n\
             \n\
             CLIENT: {age}yo {sex}, {height}cm, {weight}kg, {body_type}\n\
             DATE: {date}\n\
             SEASON: {season} ({season_name})\n\
             STYLE: {style}\n\
             BRANDS: {brands}\n\
             \n\
             SELECTED PIECES:\n\
             {pieces}\n\
             \n\
             COLORS (MANDATORY): {palette}\n\
             BOTTOMS: Navy, Black, Charcoal, Khaki, Beige\n\
             \n\
             FIT: Bottoms={pants_fit}, Tops={tops_fit}, Size={multiplier}\n\
             NOTES: {notes}\n\
             SHOES: {shoe_advice}\n\
             \n\
             FORMAT (4-6 sentences):\n\
             1. TOP: \"[COLOR] [fabric] [neckline type], relaxed\"\n\
             2. BOTTOMS: \"[COLOR] [fabric] [type], full-length to shoes\"\n\
             3. FOOTWEAR: \"[COLOR] [material] [shoe type]\" (MANDATORY)\n\
             4. {layering}\n\
             5. ACCESSORIES: {accessories}\n\
             \n\
             {female_note}\n\
             \n\
             CRITICAL: Name EXACT color for EVERY item. Example: \"Sky Blue cotton crewneck\" NOT \"light top\".\n",
            age = p.age,
            sex = p.sex,
            height = p.height,
            weight = p.weight,
            body_type = p.body_type,
            date = self.date.format("%B %d, %Y"),
            season = self.season.code(),
            season_name = self.season.name(),
            style = excerpt(&p.style_description, STYLE_EXCERPT_CHARS),
            brands = brands_or_none(&p.favorite_brands),
            pieces = selected_pieces(self.outfit),
            palette = self.primary_palette.format(false),
            pants_fit = self.fits.pants,
            tops_fit = self.fits.tops,
            multiplier = self.fits.size_multiplier,
            notes = fit_notes(p.body_type),
            shoe_advice = self.shoe_guide.recommendation,
            layering = layering_instruction(self.season, self.fits.vibe),
            accessories = accessories(p.age, self.fits.vibe),
            female_note = female_note,
        )
    }

    /// Mannequin description followed by the clothing overlay
    pub fn image_prompt(&self, outfit_description: &str) -> String {
        let p = self.profile;
        format!(
            "Professional fashion photo. Gray mannequin (#808080) FULLY CLOTHED, A-pose, front view.\n\
             \n\
             MANNEQUIN:\n\
             - Featureless gray head/neck/hands (#808080) - smooth, NO face\n\
             - {sex} {body_type} build, {height}cm\n\
             - {body_visual}\n\
             - {shape_note}\n\
             - Body 100% HIDDEN by clothing\n\
             \n\
             POSE:\n\
             - Standing, frontal, arms 20\u{b0} from sides\n\
             - Hands OUTSIDE pockets, visible\n\
             - Feet parallel, shoulder-width\n\
             \n\
             OUTFIT (EXACT):\n\
             {outfit}\n\
             \n\
             FIT: {multiplier} - loose draping, natural folds, deep shadows\n\
             PANTS: Full-length covering ankles, stacking at shoes\n\
             SHOES: Volumetric 3D {shoe_color} shoes, NO gray feet visible, thick soles (2-4cm)\n\
             COLORS: Vibrant, saturated, match description exactly\n\
             LIGHTING: Studio 3-point, soft shadows\n\
             BACKGROUND: Light gray (RGB 220,220,220)",
            sex = p.sex,
            body_type = p.body_type,
            height = p.height,
            body_visual = body_visual_description(p.height, p.weight, p.body_type, p.sex),
            shape_note = body_shape_note(p.body_type, p.sex),
            outfit = outfit_description,
            multiplier = self.fits.size_multiplier,
            shoe_color = extract_shoe_color(outfit_description),
        )
    }

    pub fn styling_tips_prompt(&self) -> String {
        let alternative = self
            .alternative_palette
            .colors
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "50-word max seasonal tip.\n\
             \n\
             SEASON: {season}\n\
             CLIENT: {age}yo {sex}, {body_type}\n\
             ALTERNATIVE: {alternative}\n\
             \n\
             Include: fabrics ({fabrics}), silhouettes, 3 colors. Professional. Max 50 words.\n",
            season = self.season.code(),
            age = self.profile.age,
            sex = self.profile.sex,
            body_type = self.profile.body_type,
            alternative = alternative,
            fabrics = self.season.fabrics().join(", "),
        )
    }
}

/// `SLOT: BRAND Category - colors` for every filled slot
pub fn outfit_summary(outfit: &OutfitSelection) -> String {
    let mut lines = Vec::new();
    for slot in GarmentSlot::ALL {
        let label = slot.as_str().to_uppercase();
        if let Some(item) = outfit.item(slot) {
            let colors: Vec<&str> = item.known_colors().collect();
            let colors = if colors.is_empty() {
                "N/A".to_string()
            } else {
                colors.join(", ")
            };
            lines.push(format!(
                "{}: {} {} - {}",
                label,
                item.brand.to_uppercase(),
                title_case(&item.category),
                colors
            ));
        } else if let (GarmentSlot::Shoe, Some(ShoeChoice::Generated(shoe))) = (slot, &outfit.shoe) {
            lines.push(format!("{}: {}", label, title_case(&shoe.describe())));
        }
    }
    lines.join("\n")
}

/// Plain-text rendition of the whole recommendation
pub fn format_complete_response(
    outfit_description: &str,
    outfit: &OutfitSelection,
    styling_tips: &str,
    measurements: &BodyMeasurements,
) -> String {
    let mut parts = vec![
        "=== YOUR OUTFIT ===".to_string(),
        outfit_description.trim().to_string(),
        String::new(),
        outfit_summary(outfit),
        String::new(),
        "=== PRODUCT LINKS ===".to_string(),
    ];

    for slot in [GarmentSlot::Top, GarmentSlot::Pants, GarmentSlot::Shoe] {
        let url = outfit
            .item(slot)
            .and_then(|item| item.url.as_deref())
            .unwrap_or("N/A");
        parts.push(format!("{}: {}", slot.as_str().to_uppercase(), url));
    }
    if let Some(url) = outfit.layer.as_ref().and_then(|l| l.url.as_deref()) {
        parts.push(format!("LAYER: {}", url));
    }

    parts.extend([
        String::new(),
        "=== STYLING TIP ===".to_string(),
        styling_tips.to_string(),
        String::new(),
        "=== YOUR MEASUREMENTS ===".to_string(),
        format!(
            "Chest: {}cm | Waist: {}cm | Hips: {}cm | BMI: {:.1}",
            measurements.chest_circumference,
            measurements.waist_circumference,
            measurements.hip_circumference,
            measurements.bmi
        ),
    ]);

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_shoe_color() {
        assert_eq!(
            extract_shoe_color("Navy wool coat. White leather sneakers complete the look."),
            "Leather"
        );
        assert_eq!(extract_shoe_color("Burgundy loafers"), "Burgundy");
        assert_eq!(extract_shoe_color("boots first"), "Black");
        assert_eq!(extract_shoe_color(""), "Black");
    }

    #[test]
    fn test_layering_and_accessories() {
        assert!(layering_instruction(Season::FallWinter, StyleVibe::Elegant).contains("blazer/coat"));
        assert!(layering_instruction(Season::SpringSummer, StyleVibe::Elegant).starts_with("OUTERWEAR"));
        assert_eq!(accessories(17, StyleVibe::Casual), "Minimal accessories");
        assert_eq!(accessories(35, StyleVibe::Casual), "Watch, belt, optional tie (if elegant)");
    }

    #[test]
    fn test_body_visual_description() {
        let male = body_visual_description(180, 110, BodyType::PlusSize, Sex::Male);
        assert!(male.starts_with("Plus-size male (180cm, 110kg, BMI 34.0)"));
        assert!(male.contains("Apple shape"));
        let slim = body_visual_description(165, 50, BodyType::Slim, Sex::Female);
        assert!(slim.starts_with("Lean female frame"));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("déjà vu", 3), "déj");
        assert_eq!(excerpt("short", 80), "short");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("polo_shirt"), "Polo Shirt");
        assert_eq!(title_case("JEANS"), "Jeans");
    }
}

use serde::{Deserialize, Serialize};
use crate::models::{
    normalize_brand, ClothingItem, Gender, GarmentSlot, StyleKeywords, UserProfile,
};

/// Synonyms for each canonical slot, checked in slot order
const CATEGORY_SYNONYMS: [(GarmentSlot, &[&str]); 4] = [
    (
        GarmentSlot::Top,
        &[
            "t-shirt", "shirt", "hoodie", "jumper", "sweater", "top", "sweatshirt",
            "tank_top", "polo_shirt", "cardigan", "blouse",
        ],
    ),
    (
        GarmentSlot::Pants,
        &[
            "pants", "trousers", "jeans", "jorts", "skirt", "leggings", "joggers", "shorts",
            "chinos",
        ],
    ),
    (
        GarmentSlot::Shoe,
        &[
            "shoe", "shoes", "sneaker", "sneakers", "trainer", "trainers", "boot", "boots",
            "footwear", "running-shoes", "casual-shoes", "sandals", "loafers",
        ],
    ),
    (
        GarmentSlot::Layer,
        &["jacket", "coat", "blazer", "overshirt", "parka", "vest", "cardigan", "bomber"],
    ),
];

/// Map a raw catalog category onto a canonical slot
///
/// Containment is checked in both directions and the first slot with a
/// matching synonym wins. Blank or unmatched categories yield `None`.
pub fn normalize_category(raw: &str) -> Option<GarmentSlot> {
    let raw = raw.trim().to_lowercase();
    if raw.is_empty() {
        return None;
    }
    CATEGORY_SYNONYMS
        .iter()
        .find(|(_, synonyms)| {
            synonyms
                .iter()
                .any(|s| raw == *s || raw.contains(s) || s.contains(raw.as_str()))
        })
        .map(|(slot, _)| *slot)
}

/// Bidirectional, case-insensitive substring containment
#[inline]
fn loosely_matches(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Non-blank criterion value; blank strings count as absent
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Catalog filter criteria; absent or blank criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClothingFilter {
    pub gender: Option<Gender>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub style: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl ClothingFilter {
    pub fn is_empty(&self) -> bool {
        self.gender.is_none()
            && active(&self.brand).is_none()
            && active(&self.category).is_none()
            && active(&self.style).is_none()
            && self.wanted_colors().next().is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
    }

    fn wanted_colors(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
    }

    /// All criteria are AND-ed together
    pub fn matches(&self, item: &ClothingItem) -> bool {
        if let Some(gender) = self.gender {
            if !item.gender.accepts(gender) {
                return false;
            }
        }

        if let Some(brand) = active(&self.brand) {
            if item.normalized_brand() != normalize_brand(brand) {
                return false;
            }
        }

        if let Some(category) = active(&self.category) {
            if !item.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(style) = active(&self.style) {
            if !item.style.eq_ignore_ascii_case(style) {
                return false;
            }
        }

        let colors: Vec<String> = self.wanted_colors().map(str::to_string).collect();
        if !colors.is_empty() && !has_any_color(item, &colors) {
            return false;
        }

        if let Some(min) = self.price_min {
            if item.price_eur < min {
                return false;
            }
        }

        if let Some(max) = self.price_max {
            if item.price_eur > max {
                return false;
            }
        }

        true
    }
}

/// At least one wanted color loosely matches one of the item's known colors
pub fn has_any_color(item: &ClothingItem, wanted: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| item.known_colors().any(|c| loosely_matches(w, c)))
}

/// Keep the items matching every criterion, preserving order
pub fn filter_items(items: &[ClothingItem], filter: &ClothingFilter) -> Vec<ClothingItem> {
    items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect()
}

/// A catalog item with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item: ClothingItem,
    pub score: u32,
}

pub const STYLE_MATCH_POINTS: u32 = 3;
pub const COLOR_MATCH_POINTS: u32 = 2;
pub const BRAND_MATCH_POINTS: u32 = 5;

/// Additive relevance score of one item
///
/// +3 once if any style keyword matches the style tag, +2 per color
/// preference matching any item color, +5 once for a favorite brand.
pub fn score_item(item: &ClothingItem, keywords: &StyleKeywords, favorite_brands: &[String]) -> u32 {
    let mut score = 0;

    if keywords
        .style_keywords
        .iter()
        .any(|kw| loosely_matches(kw, &item.style))
    {
        score += STYLE_MATCH_POINTS;
    }

    for pref in &keywords.color_preferences {
        if item.known_colors().any(|c| loosely_matches(pref, c)) {
            score += COLOR_MATCH_POINTS;
        }
    }

    let brand = item.normalized_brand();
    if favorite_brands.iter().any(|b| normalize_brand(b) == brand) {
        score += BRAND_MATCH_POINTS;
    }

    score
}

/// Score every item and order by descending score
///
/// The sort is stable, so equal scores keep catalog order.
pub fn score_and_rank(
    items: &[ClothingItem],
    keywords: &StyleKeywords,
    profile: &UserProfile,
) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = items
        .iter()
        .map(|item| ScoredItem {
            score: score_item(item, keywords, &profile.favorite_brands),
            item: item.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, brand: &str, category: &str, gender: Gender, colors: &[&str], style: &str) -> ClothingItem {
        ClothingItem {
            id: id.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            gender,
            colors: colors.iter().map(|c| c.to_string()).collect(),
            style: style.to_string(),
            price_eur: 29.9,
            url: None,
        }
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("Hoodie"), Some(GarmentSlot::Top));
        assert_eq!(normalize_category("slim jeans"), Some(GarmentSlot::Pants));
        assert_eq!(normalize_category("chelsea boot"), Some(GarmentSlot::Shoe));
        assert_eq!(normalize_category("parka"), Some(GarmentSlot::Layer));
        assert_eq!(normalize_category("cardigan"), Some(GarmentSlot::Top));
        assert_eq!(normalize_category("umbrella"), None);
        assert_eq!(normalize_category("  "), None);
    }

    #[test]
    fn test_brand_filter_normalizes() {
        let items = vec![item("1", "Pull-and Bear", "jeans", Gender::Man, &["blue"], "casual")];
        let filter = ClothingFilter {
            brand: Some("pull_and-bear".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_items(&items, &filter).len(), 1);
    }

    #[test]
    fn test_blank_criteria_are_ignored() {
        let items = vec![
            item("1", "zara", "jeans", Gender::Man, &["blue"], "casual"),
            item("2", "hm", "shirt", Gender::Woman, &["white"], "elegant"),
        ];
        let filter = ClothingFilter {
            brand: Some(String::new()),
            category: Some("  ".to_string()),
            style: Some(String::new()),
            colors: vec![String::new(), " ".to_string()],
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter_items(&items, &filter), items);

        let filter = ClothingFilter {
            brand: Some(String::new()),
            colors: vec![String::new(), "white".to_string()],
            ..Default::default()
        };
        assert_eq!(filter_items(&items, &filter)[0].id, "2");
    }

    #[test]
    fn test_color_filter_is_bidirectional() {
        let items = vec![
            item("1", "zara", "shirt", Gender::Man, &["light blue"], "casual"),
            item("2", "zara", "shirt", Gender::Man, &["red"], "casual"),
        ];
        let filter = ClothingFilter {
            colors: vec!["blue".to_string()],
            ..Default::default()
        };
        let result = filter_items(&items, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");

        let filter = ClothingFilter {
            colors: vec!["dark red wine".to_string()],
            ..Default::default()
        };
        assert_eq!(filter_items(&items, &filter)[0].id, "2");
    }

    #[test]
    fn test_price_range() {
        let mut cheap = item("1", "hm", "shirt", Gender::Man, &["white"], "casual");
        cheap.price_eur = 9.99;
        let mut pricey = item("2", "hm", "shirt", Gender::Man, &["white"], "casual");
        pricey.price_eur = 120.0;
        let filter = ClothingFilter {
            price_min: Some(10.0),
            price_max: Some(150.0),
            ..Default::default()
        };
        let result = filter_items(&[cheap, pricey], &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_score_item() {
        let keywords = StyleKeywords {
            style_keywords: vec!["casual".to_string(), "street".to_string()],
            color_preferences: vec!["black".to_string(), "navy".to_string()],
            fit_preferences: vec![],
            season_appropriate: vec![],
        };
        let it = item("1", "Zara", "pants", Gender::Man, &["black", "navy"], "casual");
        // style once, two colors, brand once
        assert_eq!(score_item(&it, &keywords, &["zara".to_string(), "ZARA".to_string()]), 3 + 4 + 5);
    }
}

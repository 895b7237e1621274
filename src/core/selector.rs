use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use crate::core::filters::normalize_category;
use crate::models::{
    normalize_brand, ClothingItem, GarmentSlot, OutfitSelection, ShoeChoice, UserProfile,
};

/// Catalog items grouped by canonical slot; unrecognised categories are dropped
pub fn bucket_by_slot(items: &[ClothingItem]) -> HashMap<GarmentSlot, Vec<&ClothingItem>> {
    let mut buckets: HashMap<GarmentSlot, Vec<&ClothingItem>> = HashMap::new();
    for item in items {
        if let Some(slot) = normalize_category(&item.category) {
            buckets.entry(slot).or_default().push(item);
        }
    }
    buckets
}

/// Narrow to `keep` unless that leaves nothing
fn narrow<'a, F>(candidates: Vec<&'a ClothingItem>, keep: F) -> Vec<&'a ClothingItem>
where
    F: Fn(&ClothingItem) -> bool,
{
    let narrowed: Vec<&ClothingItem> = candidates.iter().copied().filter(|i| keep(i)).collect();
    if narrowed.is_empty() {
        candidates
    } else {
        narrowed
    }
}

/// Pick one item from a slot bucket
///
/// Candidates are narrowed by gender, then favourite brand, then style
/// keyword; each stage falls back to the wider set when it would empty it.
pub fn pick_for_slot<'a, R: Rng + ?Sized>(
    bucket: &[&'a ClothingItem],
    profile: &UserProfile,
    style_keywords: &[String],
    rng: &mut R,
) -> Option<&'a ClothingItem> {
    let wanted = profile.sex.catalog_gender();
    let brands: Vec<String> = profile.favorite_brands.iter().map(|b| normalize_brand(b)).collect();
    let keywords: Vec<String> = style_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let candidates = narrow(bucket.to_vec(), |i| i.gender.accepts(wanted));
    let candidates = if brands.is_empty() {
        candidates
    } else {
        narrow(candidates, |i| brands.contains(&i.normalized_brand()))
    };
    let candidates = if keywords.is_empty() {
        candidates
    } else {
        narrow(candidates, |i| {
            let style = i.style.to_lowercase();
            keywords
                .iter()
                .any(|k| !style.is_empty() && (style.contains(k.as_str()) || k.contains(&style)))
        })
    };

    candidates.choose(rng).copied()
}

/// Fill each slot from the catalog; the shoe slot is left to the caller
/// when `catalog_shoes` is false
pub fn select_outfit<R: Rng + ?Sized>(
    items: &[ClothingItem],
    profile: &UserProfile,
    style_keywords: &[String],
    catalog_shoes: bool,
    rng: &mut R,
) -> OutfitSelection {
    let buckets = bucket_by_slot(items);
    let mut pick = |slot: GarmentSlot| {
        buckets
            .get(&slot)
            .and_then(|bucket| pick_for_slot(bucket, profile, style_keywords, rng))
            .cloned()
    };

    let top = pick(GarmentSlot::Top);
    let pants = pick(GarmentSlot::Pants);
    let shoe = if catalog_shoes {
        pick(GarmentSlot::Shoe).map(ShoeChoice::Catalog)
    } else {
        None
    };
    let layer = pick(GarmentSlot::Layer);

    OutfitSelection {
        top,
        pants,
        shoe,
        layer,
    }
}

/// Outcome of the completeness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitValidation {
    pub is_valid: bool,
    pub missing: Vec<GarmentSlot>,
}

/// An outfit needs at least a top or pants
pub fn validate_outfit(outfit: &OutfitSelection) -> OutfitValidation {
    if outfit.top.is_some() || outfit.pants.is_some() {
        OutfitValidation {
            is_valid: true,
            missing: Vec::new(),
        }
    } else {
        OutfitValidation {
            is_valid: false,
            missing: vec![GarmentSlot::Top, GarmentSlot::Pants],
        }
    }
}

/// Slot name to product url for selected catalog items that have one
pub fn product_links(outfit: &OutfitSelection) -> BTreeMap<String, String> {
    GarmentSlot::ALL
        .iter()
        .filter_map(|slot| {
            outfit
                .item(*slot)
                .and_then(|item| item.url.as_ref())
                .map(|url| (slot.as_str().to_string(), url.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BodyType, Gender, Sex};
    use rand::{rngs::StdRng, SeedableRng};

    fn item(id: &str, brand: &str, category: &str, gender: Gender, style: &str) -> ClothingItem {
        ClothingItem {
            id: id.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            gender,
            colors: vec!["black".to_string()],
            style: style.to_string(),
            price_eur: 19.99,
            url: Some(format!("https://shop.example/{}", id)),
        }
    }

    fn profile(sex: Sex, brands: &[&str]) -> UserProfile {
        UserProfile {
            sex,
            height: 175,
            weight: 70,
            age: 30,
            shoe_size: 42,
            body_type: BodyType::Average,
            favorite_brands: brands.iter().map(|b| b.to_string()).collect(),
            style_description: "casual".to_string(),
        }
    }

    #[test]
    fn test_bucket_skips_unknown_categories() {
        let items = vec![
            item("1", "zara", "t-shirt", Gender::Man, "casual"),
            item("2", "zara", "umbrella", Gender::Man, "casual"),
            item("3", "zara", "jeans", Gender::Man, "casual"),
        ];
        let buckets = bucket_by_slot(&items);
        assert_eq!(buckets[&GarmentSlot::Top].len(), 1);
        assert_eq!(buckets[&GarmentSlot::Pants].len(), 1);
        assert!(!buckets.contains_key(&GarmentSlot::Shoe));
    }

    #[test]
    fn test_pick_prefers_gender_brand_style() {
        let items = vec![
            item("w", "nike", "hoodie", Gender::Woman, "sport"),
            item("m1", "zara", "hoodie", Gender::Man, "elegant"),
            item("m2", "nike", "hoodie", Gender::Man, "street"),
            item("m3", "nike", "hoodie", Gender::Unisex, "sport"),
        ];
        let refs: Vec<&ClothingItem> = items.iter().collect();
        let user = profile(Sex::Male, &["Nike"]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let picked = pick_for_slot(&refs, &user, &["sport".to_string()], &mut rng);
            assert_eq!(picked.map(|i| i.id.as_str()), Some("m3"));
        }
    }

    #[test]
    fn test_pick_falls_back_when_narrowing_empties() {
        let items = vec![item("w", "hm", "jeans", Gender::Woman, "casual")];
        let refs: Vec<&ClothingItem> = items.iter().collect();
        let user = profile(Sex::Male, &["zara"]);
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick_for_slot(&refs, &user, &["elegant".to_string()], &mut rng);
        assert_eq!(picked.map(|i| i.id.as_str()), Some("w"));
    }

    #[test]
    fn test_select_outfit_without_catalog_shoes() {
        let items = vec![
            item("t", "zara", "shirt", Gender::Man, "casual"),
            item("s", "zara", "sneakers", Gender::Man, "casual"),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let outfit = select_outfit(&items, &profile(Sex::Male, &[]), &[], false, &mut rng);
        assert!(outfit.top.is_some());
        assert!(outfit.pants.is_none());
        assert!(outfit.shoe.is_none());

        let outfit = select_outfit(&items, &profile(Sex::Male, &[]), &[], true, &mut rng);
        assert!(matches!(outfit.shoe, Some(ShoeChoice::Catalog(_))));
    }

    #[test]
    fn test_validate_top_or_pants() {
        let mut outfit = OutfitSelection::default();
        let result = validate_outfit(&outfit);
        assert!(!result.is_valid);
        assert_eq!(result.missing, vec![GarmentSlot::Top, GarmentSlot::Pants]);

        outfit.pants = Some(item("p", "hm", "jeans", Gender::Man, "casual"));
        assert!(validate_outfit(&outfit).is_valid);
    }

    #[test]
    fn test_product_links() {
        let mut outfit = OutfitSelection::default();
        outfit.top = Some(item("t", "hm", "shirt", Gender::Man, "casual"));
        let mut shoe = item("s", "hm", "boots", Gender::Man, "casual");
        shoe.url = None;
        outfit.shoe = Some(ShoeChoice::Catalog(shoe));
        let links = product_links(&outfit);
        assert_eq!(links.len(), 1);
        assert_eq!(links["top"], "https://shop.example/t");
    }
}

// Unit tests for Outfit Engine

use outfit_engine::core::{
    filter_items, fit_for, normalize_category, parse_message, score_and_rank, ClothingFilter,
    PaletteSelector,
};
use outfit_engine::core::measurements::compute_measurements;
use outfit_engine::core::profile::build_profile;
use outfit_engine::models::{
    BodyType, ClothingItem, Gender, GarmentSlot, Season, Sex, StyleKeywords, PLACEHOLDER_COLOR,
};
use outfit_engine::services::catalog::{load_json_dir, parse_catalog_json};
use outfit_engine::services::CatalogStore;
use rand::{rngs::StdRng, SeedableRng};

fn item(id: &str, brand: &str, category: &str, gender: Gender, colors: &[&str]) -> ClothingItem {
    ClothingItem {
        id: id.to_string(),
        brand: brand.to_string(),
        category: category.to_string(),
        gender,
        colors: colors.iter().map(|c| c.to_string()).collect(),
        style: "casual".to_string(),
        price_eur: 39.9,
        url: Some(format!("https://shop.example/{}", id)),
    }
}

#[test]
fn test_parse_full_message() {
    let parsed = parse_message("male, 173, 70, 22, 42, athletic, nike, style: elegant minimalist");

    assert_eq!(parsed.sex, Sex::Male);
    assert_eq!(parsed.height, Some(173));
    assert_eq!(parsed.weight, Some(70));
    assert_eq!(parsed.age, Some(22));
    assert_eq!(parsed.shoe_size, Some(42));
    assert_eq!(parsed.body_type, Some(BodyType::Athletic));
    assert_eq!(parsed.favorite_brands, vec!["nike"]);
    assert_eq!(parsed.style_description, "elegant minimalist");
}

#[test]
fn test_reference_measurements() {
    let m = compute_measurements(173, 70, Sex::Male);
    assert_eq!(m.bmi, 23.4);
    assert_eq!(m.chest_circumference, 53.7);
}

#[test]
fn test_measurements_are_deterministic() {
    for sex in [Sex::Male, Sex::Female] {
        assert_eq!(compute_measurements(168, 61, sex), compute_measurements(168, 61, sex));
    }
}

#[test]
fn test_circumferences_monotonic_in_weight() {
    for sex in [Sex::Male, Sex::Female] {
        for height in [150, 170, 195] {
            let mut previous = compute_measurements(height, 40, sex);
            for weight in 41..=200 {
                let current = compute_measurements(height, weight, sex);
                assert!(current.chest_circumference >= previous.chest_circumference);
                assert!(current.waist_circumference >= previous.waist_circumference);
                assert!(current.hip_circumference >= previous.hip_circumference);
                previous = current;
            }
        }
    }
}

#[test]
fn test_fit_fallback_contract() {
    for slot in GarmentSlot::ALL {
        let expected = fit_for("average", slot, "casual");
        for (body, vibe) in [("gigantic", "punk"), ("", "elegantish"), ("average", "")] {
            assert_eq!(fit_for(body, slot, vibe), expected);
        }
    }
}

#[test]
fn test_empty_filter_is_identity() {
    let items = vec![
        item("3", "zara", "jeans", Gender::Man, &["blue"]),
        item("1", "hm", "shirt", Gender::Woman, &["white"]),
        item("2", "nike", "sneakers", Gender::Unisex, &[PLACEHOLDER_COLOR]),
    ];
    let filter = ClothingFilter::default();
    assert!(filter.is_empty());
    assert_eq!(filter_items(&items, &filter), items);
}

#[test]
fn test_gender_and_brand_filter() {
    let items = vec![
        item("1", "zara", "shirt", Gender::Man, &["white"]),
        item("2", "hm", "shirt", Gender::Man, &["white"]),
        item("3", "zara", "shirt", Gender::Woman, &["white"]),
    ];
    let filter = ClothingFilter {
        gender: Some(Gender::Man),
        brand: Some("zara".to_string()),
        ..Default::default()
    };
    let result = filter_items(&items, &filter);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "1");
}

#[test]
fn test_gender_filter_accepts_unisex() {
    let items = vec![
        item("1", "zara", "shirt", Gender::Unisex, &["white"]),
        item("2", "zara", "shirt", Gender::Woman, &["white"]),
    ];
    let filter = ClothingFilter {
        gender: Some(Gender::Man),
        ..Default::default()
    };
    assert_eq!(filter_items(&items, &filter)[0].id, "1");
}

#[test]
fn test_color_filter_ignores_placeholder() {
    let items = parse_catalog_json(r#"[{"id": "a", "colors": []}, {"id": "b"}]"#).unwrap();
    assert!(items.iter().all(|i| i.colors == vec![PLACEHOLDER_COLOR]));

    for wanted in ["unknown", "n", "black"] {
        let filter = ClothingFilter {
            colors: vec![wanted.to_string()],
            ..Default::default()
        };
        assert!(filter_items(&items, &filter).is_empty());
    }
}

#[test]
fn test_ranking_is_stable() {
    let items = vec![
        item("a", "hm", "shirt", Gender::Man, &["white"]),
        item("b", "zara", "shirt", Gender::Man, &["white"]),
        item("c", "hm", "shirt", Gender::Man, &["black"]),
        item("d", "hm", "shirt", Gender::Man, &["white"]),
    ];
    let keywords = StyleKeywords {
        style_keywords: vec!["formal".to_string()],
        color_preferences: vec!["black".to_string()],
        fit_preferences: vec![],
        season_appropriate: vec![],
    };
    let profile = build_profile(
        parse_message("male, 180, 80, 30, 43, zara, style: formal"),
        BodyType::Average,
    )
    .unwrap();

    let ranked: Vec<(String, u32)> = score_and_rank(&items, &keywords, &profile)
        .into_iter()
        .map(|s| (s.item.id, s.score))
        .collect();

    assert_eq!(
        ranked,
        vec![
            ("b".to_string(), 5),
            ("c".to_string(), 2),
            ("a".to_string(), 0),
            ("d".to_string(), 0)
        ]
    );
}

#[test]
fn test_category_normalization_covers_slots() {
    assert_eq!(normalize_category("T-Shirt"), Some(GarmentSlot::Top));
    assert_eq!(normalize_category("joggers"), Some(GarmentSlot::Pants));
    assert_eq!(normalize_category("running-shoes"), Some(GarmentSlot::Shoe));
    assert_eq!(normalize_category("Blazer"), Some(GarmentSlot::Layer));
    assert_eq!(normalize_category("scarf"), None);
}

#[test]
fn test_fall_winter_palettes_differ_in_mood() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..25 {
        let selector = PaletteSelector::new(5);
        let pair = selector.pick_two_for_season(Season::FallWinter, &["casual".to_string()], &mut rng);
        assert_eq!(pair.primary.season, Season::FallWinter);
        assert_eq!(pair.alternative.season, Season::FallWinter);
        assert_ne!(pair.primary.mood, pair.alternative.mood);
    }
}

#[test]
fn test_style_description_word_limit() {
    let thirty = vec!["cozy"; 30].join(" ");
    let ok = parse_message(&format!("female, 165, 56, 25, 37, style: {}", thirty));
    assert!(build_profile(ok, BodyType::Slim).is_ok());

    let thirty_one = vec!["cozy"; 31].join(" ");
    let too_long = parse_message(&format!("female, 165, 56, 25, 37, style: {}", thirty_one));
    let err = build_profile(too_long, BodyType::Slim).unwrap_err();
    assert!(err.to_string().contains("too long"));
}

#[test]
fn test_catalog_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"[
        {"id": 1, "brand": "Zara", "category": "jeans", "gender": "man", "colors": "Blue", "price_eur": "29.90"},
        {"id": "2", "category": "hoodie", "colors": ["Black", "White"], "url": "https://shop.example/2"}
    ]"#;
    std::fs::write(dir.path().join("catalog.json"), raw).unwrap();
    let first = load_json_dir(dir.path()).unwrap();

    let reserialized = serde_json::to_string(&first).unwrap();
    std::fs::write(dir.path().join("catalog.json"), reserialized).unwrap();
    let second = load_json_dir(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].colors, vec!["blue"]);
    assert_eq!(first[1].gender, Gender::Unisex);
}

#[test]
fn test_fixed_catalog_is_preloaded() {
    let store = CatalogStore::from_items(vec![
        item("1", "zara", "shirt", Gender::Man, &["white"]),
        item("2", "hm", "jeans", Gender::Woman, &["blue"]),
    ]);
    assert_eq!(store.loaded_len(), Some(2));
    let items = tokio_test::block_on(store.items()).unwrap();
    assert_eq!(items.len(), 2);
}

use regex::Regex;
use std::sync::OnceLock;
use crate::models::{BodyType, ParsedInput, Sex};

/// Style used when the message carries no `style:` segment
pub const DEFAULT_STYLE: &str = "casual comfortable";

/// Maximum number of brands kept from the message
pub const MAX_BRANDS: usize = 3;

const FEMALE_MARKERS: [&str; 5] = ["female", "woman", "girl", "femeie", "fata"];

fn style_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bstyle:\s*").expect("style marker regex is valid"))
}

fn first_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("integer regex is valid"))
}

/// Classify the sex token; anything unrecognised is treated as male
pub fn detect_sex(token: &str) -> Sex {
    let token = token.trim().to_lowercase();
    match token.as_str() {
        "male" | "m" | "man" | "boy" | "barbat" | "baiat" | "b" => return Sex::Male,
        "female" | "f" | "woman" | "girl" | "femeie" | "fata" => return Sex::Female,
        _ => {}
    }
    // "female" and "woman" contain the male markers, so only these are checked
    if FEMALE_MARKERS.iter().any(|m| token.contains(m)) {
        Sex::Female
    } else {
        Sex::Male
    }
}

/// First run of digits in a token, if it fits in a u32
pub fn extract_int(token: &str) -> Option<u32> {
    first_integer()
        .find(token)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse `sex, height, weight, age, shoe, [body type,] brands, style: text`
///
/// Never fails. Missing or non-numeric measurement tokens are reported as
/// `None`; rejecting them is left to profile validation.
pub fn parse_message(raw: &str) -> ParsedInput {
    let raw = raw.trim();
    let mut parts = style_marker().splitn(raw, 2);
    let measurements_part = parts.next().unwrap_or("").trim();
    let style_description = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STYLE)
        .to_string();

    let tokens: Vec<&str> = measurements_part
        .split(',')
        .map(str::trim)
        .collect();

    let sex = tokens
        .first()
        .filter(|t| !t.is_empty())
        .map(|t| detect_sex(t))
        .unwrap_or(Sex::Male);

    let number_at = |idx: usize| tokens.get(idx).and_then(|t| extract_int(t));

    // Token 5 is a body type when it names one, otherwise it starts the brands
    let (body_type, brand_token) = match tokens.get(5) {
        Some(token) => match token.parse::<BodyType>() {
            Ok(bt) => (Some(bt), tokens.get(6).copied()),
            Err(_) => (None, Some(*token)),
        },
        None => (None, None),
    };

    let favorite_brands = brand_token
        .map(split_brands)
        .unwrap_or_default();

    let parsed = ParsedInput {
        sex,
        height: number_at(1),
        weight: number_at(2),
        age: number_at(3),
        shoe_size: number_at(4),
        body_type,
        favorite_brands,
        style_description,
    };

    tracing::debug!(
        "Parsed message: sex={}, height={:?}, weight={:?}, age={:?}, shoe={:?}, brands={:?}",
        parsed.sex,
        parsed.height,
        parsed.weight,
        parsed.age,
        parsed.shoe_size,
        parsed.favorite_brands
    );

    parsed
}

/// Brands are separated by whitespace or hyphens (`zara-bershka`)
fn split_brands(token: &str) -> Vec<String> {
    token
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .take(MAX_BRANDS)
        .collect()
}

/// Recommended message format, shown to users who send malformed input
pub fn format_instructions() -> &'static str {
    "Recommended format:\n\
     `sex, height, weight, age, shoe_size, body_type, brands, style: description`\n\
     Example:\n\
     `female, 165, 56, 25, 37, slim, zara-bershka, style: emo casual with cropped shirts`\n\
     `male, 180, 75, 28, 43, athletic, nike-adidas, style: streetwear urban`"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_sex_variants() {
        assert_eq!(detect_sex("Female"), Sex::Female);
        assert_eq!(detect_sex("woman"), Sex::Female);
        assert_eq!(detect_sex("femeie"), Sex::Female);
        assert_eq!(detect_sex("barbat"), Sex::Male);
        assert_eq!(detect_sex("a young man"), Sex::Male);
        assert_eq!(detect_sex("a young woman"), Sex::Female);
        assert_eq!(detect_sex("???"), Sex::Male);
    }

    #[test]
    fn test_extract_int() {
        assert_eq!(extract_int("180cm"), Some(180));
        assert_eq!(extract_int("about 75 kg"), Some(75));
        assert_eq!(extract_int("tall"), None);
        assert_eq!(extract_int("99999999999"), None);
    }

    #[test]
    fn test_missing_numbers_are_none() {
        let parsed = parse_message("woman, 168, style: bohemian natural");
        assert_eq!(parsed.sex, Sex::Female);
        assert_eq!(parsed.height, Some(168));
        assert_eq!(parsed.weight, None);
        assert_eq!(parsed.age, None);
        assert_eq!(parsed.shoe_size, None);
        assert_eq!(parsed.style_description, "bohemian natural");
    }

    #[test]
    fn test_brands_without_body_type() {
        let parsed = parse_message("male, 180, 75, 28, 43, nike adidas puma asics");
        assert_eq!(parsed.body_type, None);
        assert_eq!(parsed.favorite_brands, vec!["nike", "adidas", "puma"]);
        assert_eq!(parsed.style_description, DEFAULT_STYLE);
    }

    #[test]
    fn test_hyphenated_brands_after_body_type() {
        let parsed = parse_message("female, 165, 56, 25, 37, slim, zara-bershka, STYLE: emo casual");
        assert_eq!(parsed.body_type, Some(BodyType::Slim));
        assert_eq!(parsed.favorite_brands, vec!["zara", "bershka"]);
        assert_eq!(parsed.style_description, "emo casual");
    }

    #[test]
    fn test_empty_message() {
        let parsed = parse_message("");
        assert_eq!(parsed.sex, Sex::Male);
        assert_eq!(parsed.height, None);
        assert!(parsed.favorite_brands.is_empty());
    }
}

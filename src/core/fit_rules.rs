use crate::models::{BodyType, FitSummary, GarmentSlot, StyleVibe};

/// Garment family the fit table distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitGarment {
    Pants,
    Tops,
}

impl From<GarmentSlot> for FitGarment {
    fn from(slot: GarmentSlot) -> Self {
        match slot {
            GarmentSlot::Pants => FitGarment::Pants,
            _ => FitGarment::Tops,
        }
    }
}

/// Fit descriptors for one body type
struct BodyFit {
    pants_elegant: &'static str,
    pants_casual: &'static str,
    tops_elegant: &'static str,
    tops_casual: &'static str,
    notes: &'static str,
}

const SLIM: BodyFit = BodyFit {
    pants_elegant: "regular-fit",
    pants_casual: "regular-fit",
    tops_elegant: "regular-fit",
    tops_casual: "regular-fit",
    notes: "Slim body type: regular fits work best.",
};

const ATHLETIC: BodyFit = BodyFit {
    pants_elegant: "regular-fit (regular upper leg, standard length)",
    pants_casual: "loose-fit (regular upper leg, looser lower leg, standard length)",
    tops_elegant: "regular-fit (room for shoulders)",
    tops_casual: "relaxed-fit",
    notes: "Athletic build needs regular/loose fits with room for shoulders and chest.",
};

const AVERAGE: BodyFit = BodyFit {
    pants_elegant: "regular-fit (standard length)",
    pants_casual: "loose-fit (standard length)",
    tops_elegant: "regular-fit",
    tops_casual: "relaxed-fit",
    notes: "Average build is versatile; balanced proportions work with most fits.",
};

const MUSCULAR: BodyFit = BodyFit {
    pants_elegant: "straight-fit with room in thighs (standard length)",
    pants_casual: "straight-fit with room in thighs (standard length)",
    tops_elegant: "regular-fit with room for chest/shoulders",
    tops_casual: "regular-fit with room for chest/shoulders",
    notes: "Muscular build needs room. Avoid tight pants.",
};

const STOCKY: BodyFit = BodyFit {
    pants_elegant: "straight-fit (standard length)",
    pants_casual: "straight-fit (standard length)",
    tops_elegant: "regular-fit",
    tops_casual: "relaxed-fit",
    notes: "Stocky build works best with straight/regular fits, avoid tight.",
};

const PLUS_SIZE: BodyFit = BodyFit {
    pants_elegant: "straight-fit for comfort (standard length)",
    pants_casual: "relaxed-fit for comfort (standard length)",
    tops_elegant: "relaxed-fit with flowing fabrics",
    tops_casual: "relaxed-fit",
    notes: "Plus-size build needs comfortable, non-clingy fabrics.",
};

fn body_fit(body_type: BodyType) -> &'static BodyFit {
    match body_type {
        BodyType::Slim => &SLIM,
        BodyType::Athletic => &ATHLETIC,
        BodyType::Average => &AVERAGE,
        BodyType::Muscular => &MUSCULAR,
        BodyType::Stocky => &STOCKY,
        BodyType::PlusSize => &PLUS_SIZE,
    }
}

const ELEGANT_KEYWORDS: [&str; 6] = ["elegant", "formal", "sophisticated", "professional", "business", "refined"];
const CASUAL_KEYWORDS: [&str; 5] = ["casual", "comfortable", "relaxed", "streetwear", "laid-back"];
const OVERSIZED_KEYWORDS: [&str; 5] = ["oversized", "baggy", "loose", "relaxed fit", "big"];
const SLIM_KEYWORDS: [&str; 4] = ["slim", "fitted", "tight", "skinny"];

pub const OVERSIZED_FIT: &str = "oversized (30% larger than standard)";
pub const SLIM_TO_REGULAR_FIT: &str = "regular-fit (slim requested, using regular for proper fit)";

/// Typed fit lookup
pub fn fit_rule(body_type: BodyType, garment: FitGarment, vibe: StyleVibe) -> &'static str {
    let fit = body_fit(body_type);
    match (garment, vibe) {
        (FitGarment::Pants, StyleVibe::Elegant) => fit.pants_elegant,
        (FitGarment::Pants, StyleVibe::Casual) => fit.pants_casual,
        (FitGarment::Tops, StyleVibe::Elegant) => fit.tops_elegant,
        (FitGarment::Tops, StyleVibe::Casual) => fit.tops_casual,
    }
}

/// Fit lookup from raw strings
///
/// Unknown body types resolve to `average` and unknown vibes to `casual`.
pub fn fit_for(body_type: &str, slot: GarmentSlot, style_vibe: &str) -> &'static str {
    fit_rule(
        BodyType::parse_or_average(body_type),
        slot.into(),
        StyleVibe::parse_or_casual(style_vibe),
    )
}

pub fn fit_notes(body_type: BodyType) -> &'static str {
    body_fit(body_type).notes
}

/// Count elegant versus casual keywords; ties go to casual
pub fn determine_style_vibe(style_description: &str) -> StyleVibe {
    let text = style_description.to_lowercase();
    let elegant = ELEGANT_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count();
    let casual = CASUAL_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count();
    if elegant > casual {
        StyleVibe::Elegant
    } else {
        StyleVibe::Casual
    }
}

/// Apply explicit size requests from the style text
///
/// Oversized requests only affect tops. Slim requests are downgraded to a
/// regular fit for every garment.
pub fn adjust_fit_size(base_fit: &str, style_description: &str, garment: FitGarment) -> String {
    let text = style_description.to_lowercase();

    if garment == FitGarment::Tops && OVERSIZED_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return OVERSIZED_FIT.to_string();
    }

    if SLIM_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return SLIM_TO_REGULAR_FIT.to_string();
    }

    base_fit.to_string()
}

/// How much larger than the body the garments should drape in the image
pub fn size_multiplier(body_type: BodyType) -> &'static str {
    match body_type {
        BodyType::Slim => "1.7x larger",
        BodyType::Average | BodyType::Athletic => "1.8x larger",
        BodyType::Muscular => "1.9x larger",
        BodyType::Stocky => "2.5x larger",
        BodyType::PlusSize => "2.6x larger",
    }
}

/// Resolve the vibe, base fits and size adjustments for a profile
pub fn summarize_fits(body_type: BodyType, style_description: &str) -> FitSummary {
    let vibe = determine_style_vibe(style_description);
    let pants = adjust_fit_size(
        fit_rule(body_type, FitGarment::Pants, vibe),
        style_description,
        FitGarment::Pants,
    );
    let tops = adjust_fit_size(
        fit_rule(body_type, FitGarment::Tops, vibe),
        style_description,
        FitGarment::Tops,
    );

    FitSummary {
        vibe,
        pants,
        tops,
        size_multiplier: size_multiplier(body_type).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lookups() {
        assert_eq!(fit_for("slim", GarmentSlot::Pants, "elegant"), "regular-fit");
        assert_eq!(fit_for("athletic", GarmentSlot::Top, "casual"), "relaxed-fit");
        assert_eq!(
            fit_for("muscular", GarmentSlot::Layer, "elegant"),
            "regular-fit with room for chest/shoulders"
        );
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        for slot in GarmentSlot::ALL {
            let fallback = fit_for("average", slot, "casual");
            assert_eq!(fit_for("giant", slot, "smart-casual"), fallback);
            assert_eq!(fit_for("", slot, ""), fallback);
        }
    }

    #[test]
    fn test_vibe_ties_go_casual() {
        assert_eq!(determine_style_vibe("elegant casual"), StyleVibe::Casual);
        assert_eq!(determine_style_vibe("formal business look"), StyleVibe::Elegant);
        assert_eq!(determine_style_vibe("anything"), StyleVibe::Casual);
    }

    #[test]
    fn test_size_adjustments() {
        assert_eq!(
            adjust_fit_size("regular-fit", "oversized streetwear", FitGarment::Tops),
            OVERSIZED_FIT
        );
        assert_eq!(
            adjust_fit_size("loose-fit", "oversized streetwear", FitGarment::Pants),
            "loose-fit"
        );
        assert_eq!(
            adjust_fit_size("loose-fit", "slim fit elegant", FitGarment::Pants),
            SLIM_TO_REGULAR_FIT
        );
        assert_eq!(
            adjust_fit_size("loose-fit", "casual comfortable", FitGarment::Pants),
            "loose-fit"
        );
    }

    #[test]
    fn test_summarize_fits() {
        let fits = summarize_fits(BodyType::Athletic, "elegant minimalist");
        assert_eq!(fits.vibe, StyleVibe::Elegant);
        assert_eq!(fits.pants, "regular-fit (regular upper leg, standard length)");
        assert_eq!(fits.size_multiplier, "1.8x larger");
    }
}

// Core algorithm exports
pub mod filters;
pub mod fit_rules;
pub mod measurements;
pub mod palette;
pub mod parser;
pub mod profile;
pub mod prompts;
pub mod selector;
pub mod shoes;

pub use filters::{filter_items, normalize_category, score_and_rank, ClothingFilter, ScoredItem};
pub use fit_rules::{determine_style_vibe, fit_for, summarize_fits};
pub use measurements::compute_measurements;
pub use palette::{PalettePair, PaletteSelector};
pub use parser::parse_message;
pub use profile::{build_profile, ProfileError};
pub use prompts::PromptContext;
pub use selector::{product_links, select_outfit, validate_outfit, OutfitValidation};
pub use shoes::{pick_generated_shoe, shoe_for, ShoeGuide};

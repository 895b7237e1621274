use thiserror::Error;
use validator::{Validate, ValidationErrors};
use crate::models::{BodyType, ParsedInput, UserProfile};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{0}")]
    Invalid(String),
}

impl From<ValidationErrors> for ProfileError {
    fn from(errors: ValidationErrors) -> Self {
        ProfileError::Invalid(describe_validation_errors(&errors))
    }
}

/// Flatten validator output into `field: message` pairs, sorted by field
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Turn parser output into a validated profile
///
/// The caller-supplied body type always wins over anything found in the
/// message.
pub fn build_profile(parsed: ParsedInput, body_type: BodyType) -> Result<UserProfile, ProfileError> {
    let profile = UserProfile {
        sex: parsed.sex,
        height: parsed.height.ok_or(ProfileError::MissingField("height"))?,
        weight: parsed.weight.ok_or(ProfileError::MissingField("weight"))?,
        age: parsed.age.ok_or(ProfileError::MissingField("age"))?,
        shoe_size: parsed.shoe_size.ok_or(ProfileError::MissingField("shoe_size"))?,
        body_type,
        favorite_brands: parsed.favorite_brands,
        style_description: parsed.style_description,
    };

    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_message;

    #[test]
    fn test_caller_body_type_overrides_message() {
        let parsed = parse_message("male, 173, 70, 22, 42, athletic, nike, style: elegant minimalist");
        assert_eq!(parsed.body_type, Some(BodyType::Athletic));
        let profile = build_profile(parsed, BodyType::Stocky).unwrap();
        assert_eq!(profile.body_type, BodyType::Stocky);
        assert_eq!(profile.favorite_brands, vec!["nike"]);
    }

    #[test]
    fn test_missing_field() {
        let parsed = parse_message("female, 165, 56");
        let err = build_profile(parsed, BodyType::Slim).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: age");
    }

    #[test]
    fn test_out_of_range() {
        let parsed = parse_message("male, 250, 70, 22, 42");
        let err = build_profile(parsed, BodyType::Average).unwrap_err();
        assert_eq!(err.to_string(), "Height must be between 140-220cm");
    }

    #[test]
    fn test_style_word_limit_boundary() {
        let thirty = vec!["word"; 30].join(" ");
        let parsed = parse_message(&format!("male, 180, 80, 30, 43, style: {}", thirty));
        assert!(build_profile(parsed, BodyType::Average).is_ok());

        let thirty_one = vec!["word"; 31].join(" ");
        let parsed = parse_message(&format!("male, 180, 80, 30, 43, style: {}", thirty_one));
        let err = build_profile(parsed, BodyType::Average).unwrap_err();
        assert_eq!(err.to_string(), "Style description too long (31 words). Max 30 words.");
    }
}

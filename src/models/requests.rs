use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::BodyType;

/// Request to generate an outfit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateOutfitRequest {
    #[validate(length(min = 1, message = "user_message must not be empty"))]
    #[serde(alias = "userMessage")]
    pub user_message: String,
    #[validate(custom(function = "validate_body_type"))]
    #[serde(alias = "bodyType")]
    pub body_type: String,
    #[serde(default = "default_user_name", alias = "userName")]
    pub user_name: String,
}

fn default_user_name() -> String {
    "User".to_string()
}

fn validate_body_type(body_type: &str) -> Result<(), ValidationError> {
    body_type.parse::<BodyType>().map(|_| ()).map_err(|msg| {
        let mut err = ValidationError::new("invalid_body_type");
        err.message = Some(msg.into());
        err
    })
}

/// Query parameters for browsing the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemsQuery {
    pub gender: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_user_name() {
        let req: GenerateOutfitRequest = serde_json::from_str(
            r#"{"user_message": "male, 180, 75", "body_type": "slim"}"#,
        )
        .unwrap();
        assert_eq!(req.user_name, "User");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_unknown_body_type() {
        let req = GenerateOutfitRequest {
            user_message: "male, 180, 75".to_string(),
            body_type: "huge".to_string(),
            user_name: "Ana".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("body_type"));
    }

    #[test]
    fn test_request_rejects_empty_message() {
        let req = GenerateOutfitRequest {
            user_message: String::new(),
            body_type: "slim".to_string(),
            user_name: "Ana".to_string(),
        };
        assert!(req.validate().is_err());
    }
}

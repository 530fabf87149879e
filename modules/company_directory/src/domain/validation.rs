//! Input validation for company pages, tab content and SEO records

use crate::contract::{CompanyPage, DirectoryError, TabKind};
use jsonschema::Validator;
use serde_json::{json, Value};

const MAX_SLUG_LEN: usize = 120;
const MAX_RATING: f64 = 5.0;

/// Validate slug format
///
/// Accepts lowercase ASCII letters, digits and '-', must start and end with
/// an alphanumeric character (e.g., "hdfc-bank", "3m-india").
pub fn validate_slug(slug: &str) -> Result<(), DirectoryError> {
    if slug.is_empty() {
        return Err(DirectoryError::validation("slug cannot be empty"));
    }

    if slug.len() > MAX_SLUG_LEN {
        return Err(DirectoryError::validation(format!(
            "slug '{}' is longer than {} characters",
            slug, MAX_SLUG_LEN
        )));
    }

    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars {
        return Err(DirectoryError::validation(format!(
            "slug '{}' contains invalid characters. Only lowercase letters, digits and '-' are allowed",
            slug
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(DirectoryError::validation(format!(
            "slug '{}' must start and end with a letter or digit",
            slug
        )));
    }

    Ok(())
}

/// Validate the scalar fields of a company page
pub fn validate_company_page(page: &CompanyPage) -> Result<(), DirectoryError> {
    validate_slug(&page.slug)?;

    if page.name.trim().is_empty() {
        return Err(DirectoryError::validation("name cannot be empty"));
    }

    if page.category_id.trim().is_empty() {
        return Err(DirectoryError::validation("categoryId cannot be empty"));
    }

    if !page.rating.is_finite() || !(0.0..=MAX_RATING).contains(&page.rating) {
        return Err(DirectoryError::validation(format!(
            "rating must be between 0 and {}, got {}",
            MAX_RATING, page.rating
        )));
    }

    if page.total_reviews < 0 {
        return Err(DirectoryError::validation("totalReviews cannot be negative"));
    }

    validate_selected_tabs(&page.selected_tabs)?;

    Ok(())
}

/// Selected tabs must not repeat a kind
pub fn validate_selected_tabs(tabs: &[TabKind]) -> Result<(), DirectoryError> {
    for (i, tab) in tabs.iter().enumerate() {
        if tabs[..i].contains(tab) {
            return Err(DirectoryError::validation(format!(
                "selectedTabs contains '{}' more than once",
                tab
            )));
        }
    }
    Ok(())
}

/// Dynamic components are an ordered list of JSON objects
pub fn validate_dynamic_components(
    components: &[Value],
    max_components: usize,
) -> Result<(), DirectoryError> {
    if components.len() > max_components {
        return Err(DirectoryError::validation(format!(
            "at most {} dynamic components are allowed, got {}",
            max_components,
            components.len()
        )));
    }

    if let Some(index) = components.iter().position(|c| !c.is_object()) {
        return Err(DirectoryError::validation(format!(
            "dynamic component at index {} must be a JSON object",
            index
        )));
    }

    Ok(())
}

/// JSON Schema for the content of a tab kind
pub fn tab_content_schema(kind: TabKind) -> Value {
    match kind {
        TabKind::Numbers => json!({
            "type": "object",
            "properties": {
                "heading": { "type": "object" },
                "cards": { "type": "array", "items": { "type": "object" } },
                "table": { "type": "object" }
            }
        }),
        _ => json!({ "type": "object" }),
    }
}

/// Validate tab content against the schema of its kind
pub fn validate_tab_content(kind: TabKind, content: &Value) -> Result<(), DirectoryError> {
    validate_against_schema(content, &tab_content_schema(kind))
}

/// Validate a value against a JSON Schema
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<(), DirectoryError> {
    let validator = Validator::new(schema).map_err(|e| DirectoryError::Validation {
        message: format!("Invalid JSON Schema: {}", e),
    })?;

    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        return Err(DirectoryError::SchemaValidation { errors });
    }

    Ok(())
}

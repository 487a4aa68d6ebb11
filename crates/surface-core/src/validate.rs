//! Payload validation: truncate-and-default rather than hard-fail.

use serde_json::Value;
use thiserror::Error;

use crate::model::{SurfacePayload, UPCOMING_CAPACITY, WEEKLY_GRID_CAPACITY};

/// Malformed payload. Only structural problems reject; over-capacity groups
/// truncate with a warning because partial-but-valid data beats a blank
/// surface.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The raw document is not valid JSON or has mistyped fields.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The document lacks the required `generatedAt` timestamp.
    #[error("payload missing generatedAt")]
    MissingGeneratedAt,
}

/// Validates a raw JSON string into a renderable payload.
pub fn validate(raw: &str) -> Result<SurfacePayload, ValidationError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_value(value)
}

/// Validates an already-parsed JSON document.
pub fn validate_value(value: Value) -> Result<SurfacePayload, ValidationError> {
    if value.get("generatedAt").map_or(true, Value::is_null) {
        return Err(ValidationError::MissingGeneratedAt);
    }

    let mut payload: SurfacePayload = serde_json::from_value(value)?;

    if payload.weekly_grid.items.len() > WEEKLY_GRID_CAPACITY {
        tracing::warn!(
            count = payload.weekly_grid.items.len(),
            capacity = WEEKLY_GRID_CAPACITY,
            "weekly grid over capacity; truncating"
        );
        payload.weekly_grid.items.truncate(WEEKLY_GRID_CAPACITY);
    }

    if payload.upcoming.items.len() > UPCOMING_CAPACITY {
        tracing::warn!(
            count = payload.upcoming.items.len(),
            capacity = UPCOMING_CAPACITY,
            "upcoming list over capacity; truncating"
        );
        payload.upcoming.items.truncate(UPCOMING_CAPACITY);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_payload_validates() {
        let p = validate(r#"{"generatedAt": 1700000000000}"#).unwrap();
        assert_eq!(p.generated_at_ms, 1_700_000_000_000);
        assert!(p.is_empty());
    }

    #[test]
    fn missing_generated_at_rejects() {
        let err = validate(r#"{"weeklyGrid": {"items": []}}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MissingGeneratedAt));

        let err = validate(r#"{"generatedAt": null}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MissingGeneratedAt));
    }

    #[test]
    fn garbage_rejects_as_malformed() {
        let err = validate("not json at all").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn oversized_grid_truncates_to_capacity() {
        let items: Vec<_> = (0..9)
            .map(|i| json!({"id": format!("g{i}"), "link": ""}))
            .collect();
        let doc = json!({
            "generatedAt": 1,
            "weeklyGrid": {"items": items, "seeAllLink": "app://grid"},
        });
        let p = validate_value(doc).unwrap();
        assert_eq!(p.weekly_grid.items.len(), WEEKLY_GRID_CAPACITY);
        assert_eq!(p.weekly_grid.items[0].id, "g0");
        assert_eq!(p.weekly_grid.items[5].id, "g5");
    }

    #[test]
    fn oversized_upcoming_truncates_to_capacity() {
        let items: Vec<_> = (0..5)
            .map(|i| json!({"id": format!("e{i}")}))
            .collect();
        let doc = json!({
            "generatedAt": 1,
            "upcoming": {"items": items},
        });
        let p = validate_value(doc).unwrap();
        assert_eq!(p.upcoming.items.len(), UPCOMING_CAPACITY);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let p = validate(r#"{"generatedAt": 1, "experiments": {"x": true}}"#).unwrap();
        assert!(p.is_empty());
    }
}

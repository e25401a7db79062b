//! Custom field typing and rendering.
//!
//! Managers define extra per-project attributes with a type tag; values are
//! stored as raw text regardless of declared type and only interpreted at
//! render time. Select fields carry their option list as a JSON array of
//! strings.

use crate::change_tracking::FieldChange;

pub const TYPE_TEXT: &str = "text";
pub const TYPE_NUMBER: &str = "number";
pub const TYPE_DATE: &str = "date";
pub const TYPE_SELECT: &str = "select";
pub const TYPE_CHECKBOX: &str = "checkbox";

/// All valid field type tags.
pub const VALID_TYPES: &[&str] = &[TYPE_TEXT, TYPE_NUMBER, TYPE_DATE, TYPE_SELECT, TYPE_CHECKBOX];

/// Value stored for an unchecked checkbox.
pub const CHECKBOX_UNCHECKED: &str = "0";

/// Value stored for a checked checkbox.
pub const CHECKBOX_CHECKED: &str = "1";

/// Validate that a field type tag is one of the accepted values.
pub fn validate_field_type(field_type: &str) -> Result<(), String> {
    if VALID_TYPES.contains(&field_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid field type '{field_type}'. Must be one of: {}",
            VALID_TYPES.join(", ")
        ))
    }
}

/// Parse the option list of a select field from its JSON-encoded form.
///
/// Returns an empty list for `None`, invalid JSON, or a JSON value that is
/// not an array of strings -- a malformed option list renders as "no
/// options" rather than failing the request.
pub fn parse_options(options_json: Option<&str>) -> Vec<String> {
    let Some(raw) = options_json else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(options) => options,
        Err(_) => Vec::new(),
    }
}

/// Normalize a submitted checkbox value.
///
/// Forms omit the key entirely for unchecked boxes, so an absent value means
/// unchecked and is stored as `"0"`; any present value is stored as `"1"`.
pub fn normalize_checkbox(submitted: Option<&str>) -> &'static str {
    match submitted {
        Some(_) => CHECKBOX_CHECKED,
        None => CHECKBOX_UNCHECKED,
    }
}

/// Render a stored value for display according to the declared type.
///
/// Values are stored permissively as text; only checkboxes get interpreted
/// (yes/no), everything else displays the raw stored value.
pub fn display_value(field_type: &str, raw: &str) -> String {
    match field_type {
        TYPE_CHECKBOX => {
            if raw == CHECKBOX_UNCHECKED || raw.is_empty() {
                "no".to_string()
            } else {
                "yes".to_string()
            }
        }
        _ => raw.to_string(),
    }
}

/// Diff a stored raw value against a newly submitted one.
///
/// Both sides render per the declared type (so checkbox changes read
/// "no -> yes"); an empty stored value shows as "-". Returns `None` when
/// the raw values are identical.
pub fn diff_value(name: &str, field_type: &str, old_raw: &str, new_raw: &str) -> Option<FieldChange> {
    if old_raw == new_raw {
        return None;
    }
    let render = |raw: &str| {
        if raw.is_empty() && field_type != TYPE_CHECKBOX {
            "-".to_string()
        } else {
            display_value(field_type, raw)
        }
    };
    Some(FieldChange {
        field: name.to_string(),
        old: render(old_raw),
        new: render(new_raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_vocabulary() {
        for t in VALID_TYPES {
            assert!(validate_field_type(t).is_ok());
        }
        assert!(validate_field_type("textarea").is_err());
    }

    #[test]
    fn test_parse_options_happy_path() {
        let options = parse_options(Some(r#"["fixed price", "time and materials"]"#));
        assert_eq!(options, vec!["fixed price", "time and materials"]);
    }

    #[test]
    fn test_parse_options_tolerates_garbage() {
        assert!(parse_options(None).is_empty());
        assert!(parse_options(Some("not json")).is_empty());
        assert!(parse_options(Some(r#"{"a": 1}"#)).is_empty());
    }

    #[test]
    fn test_checkbox_absent_key_means_unchecked() {
        assert_eq!(normalize_checkbox(None), "0");
        assert_eq!(normalize_checkbox(Some("on")), "1");
        assert_eq!(normalize_checkbox(Some("1")), "1");
    }

    #[test]
    fn test_display_checkbox_as_yes_no() {
        assert_eq!(display_value(TYPE_CHECKBOX, "0"), "no");
        assert_eq!(display_value(TYPE_CHECKBOX, ""), "no");
        assert_eq!(display_value(TYPE_CHECKBOX, "1"), "yes");
    }

    #[test]
    fn test_value_diff_from_unset_shows_placeholder() {
        let change = diff_value("Region", TYPE_SELECT, "", "north")
            .expect("setting a value is a change");
        assert_eq!(change.field, "Region");
        assert_eq!(change.old, "-");
        assert_eq!(change.new, "north");
    }

    #[test]
    fn test_value_diff_renders_checkbox_yes_no() {
        let change = diff_value("Billable", TYPE_CHECKBOX, "0", "1")
            .expect("toggling is a change");
        assert_eq!(change.old, "no");
        assert_eq!(change.new, "yes");
    }

    #[test]
    fn test_value_diff_identical_raw_is_none() {
        assert!(diff_value("Region", TYPE_SELECT, "north", "north").is_none());
        assert!(diff_value("Notes", TYPE_TEXT, "", "").is_none());
    }

    #[test]
    fn test_display_other_types_raw() {
        // Stored values are not coerced; a bad number still displays as-is.
        assert_eq!(display_value(TYPE_NUMBER, "12.5"), "12.5");
        assert_eq!(display_value(TYPE_NUMBER, "not-a-number"), "not-a-number");
        assert_eq!(display_value(TYPE_DATE, "2026-04-01"), "2026-04-01");
    }
}

//! # Validation Rules
//!
//! Two layers of client-side checks run before anything reaches the server:
//!
//! - [`check_field`] - one input against its declared constraints
//!   (numeric format, `min`, `max`, `required`). First failure wins.
//! - [`perform_client_side_validation`] - the whole [`ParameterSet`]:
//!   required keys plus cross-field engineering rules. Every failure is
//!   accumulated.
//!
//! Both are pure functions; the controller decides what to display.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::parameter_set::ParameterSet;
//! use bridge_core::validation::perform_client_side_validation;
//!
//! let params: ParameterSet = [
//!     ("SCALE1", "100"), ("SCALE2", "0"), ("LBRIDGE", "30000"), ("NSPAN", "1"),
//!     ("TOPRL", "110000"), ("SOFL", "108000"), ("CCBR", "7500"),
//! ].into_iter().collect();
//!
//! let errors = perform_client_side_validation(&params);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].message, "Scale2 cannot be zero");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;
use crate::parameter_set::{parse_number, ParameterSet};
use crate::parameters::{format_number, ParameterDefinition, ValueKind, REQUIRED_PARAMETERS};

pub const TOP_BELOW_SOFFIT: &str = "Top RL must be greater than Soffit Level";
pub const SCALE2_ZERO: &str = "Scale2 cannot be zero";
pub const SLAB_CENTER_NOT_ABOVE_EDGE: &str = "Slab thickness at center should be greater than at edge";
pub const SLAB_EDGE_NOT_ABOVE_TIP: &str = "Slab thickness at edge should be greater than at tip";
pub const FIELD_REQUIRED: &str = "This field is required";
pub const FIELD_NOT_A_NUMBER: &str = "Enter a valid number";
/// Shown when the validation endpoint cannot be used
pub const REMOTE_FAILURE: &str = "Server validation error. Please try again.";

/// A human-readable validation message, tied to a field or to the whole set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field key the message is about; `None` for set-wide messages
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn for_form(message: impl Into<String>) -> Self {
        ValidationError {
            field: None,
            message: message.into(),
        }
    }

    /// Convert into the structured error taxonomy
    pub fn to_error(&self) -> BridgeError {
        match &self.field {
            Some(field) => BridgeError::field_constraint(field.clone(), self.message.clone()),
            None => BridgeError::cross_field(self.message.clone()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Verdict of one validation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        ValidationOutcome {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<ValidationError>) -> Self {
        ValidationOutcome { valid: false, errors }
    }

    /// Valid exactly when no errors were produced
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        ValidationOutcome {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The single generic outcome used when the remote check could not run
    pub fn remote_failure() -> Self {
        ValidationOutcome::invalid(vec![ValidationError::for_form(REMOTE_FAILURE)])
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.message.as_str())
    }
}

/// Body returned by `POST /validate-parameters`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVerdict {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl From<RemoteVerdict> for ValidationOutcome {
    fn from(verdict: RemoteVerdict) -> Self {
        ValidationOutcome {
            valid: verdict.valid,
            errors: verdict.errors.into_iter().map(ValidationError::for_form).collect(),
        }
    }
}

/// Declared constraints of one form input
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConstraints {
    pub required: bool,
    /// Numeric kind; `None` for free text inputs
    pub kind: Option<ValueKind>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldConstraints {
    /// Constraints as declared by the parameter catalogue
    pub fn from_definition(def: &ParameterDefinition) -> Self {
        FieldConstraints {
            required: def.is_required(),
            kind: Some(def.kind),
            min: Some(def.min),
            max: Some(def.max),
        }
    }
}

/// Check one field value against its constraints.
///
/// Rules run in a fixed order and the first failure is returned:
/// numeric format, `min`, `max`, `required`. Empty values skip the numeric
/// rules, so an empty required field reports as required. An
/// [`ValueKind::Int`] field also rejects values with a fractional part.
///
/// ```rust
/// use bridge_core::validation::{check_field, FieldConstraints};
///
/// let c = FieldConstraints { required: true, kind: None, min: Some(1.0), max: Some(10.0) };
/// assert_eq!(check_field("0", &c).unwrap_err(), "Minimum value is 1");
/// assert_eq!(check_field("11", &c).unwrap_err(), "Maximum value is 10");
/// assert_eq!(check_field("", &c).unwrap_err(), "This field is required");
/// assert!(check_field("5", &c).is_ok());
/// ```
pub fn check_field(value: &str, constraints: &FieldConstraints) -> Result<(), String> {
    let trimmed = value.trim();
    let number = parse_number(trimmed);

    if let Some(kind) = constraints.kind {
        let malformed = match number {
            Some(v) => kind == ValueKind::Int && v.fract() != 0.0,
            None => !trimmed.is_empty(),
        };
        if malformed {
            return Err(format!("Enter a valid {}", kind.display_name()));
        }
    }

    if let (Some(v), Some(min)) = (number, constraints.min) {
        if v < min {
            return Err(format!("Minimum value is {}", format_number(min)));
        }
    }

    if let (Some(v), Some(max)) = (number, constraints.max) {
        if v > max {
            return Err(format!("Maximum value is {}", format_number(max)));
        }
    }

    if constraints.required && trimmed.is_empty() {
        return Err(FIELD_REQUIRED.to_string());
    }

    Ok(())
}

/// Run the set-wide client-side rules, accumulating every failure.
///
/// 1. Each required key must be present and non-empty. Whitespace counts as a
///    value here; [`check_field`] is where blank input is flagged.
/// 2. `TOPRL` must be strictly above `SOFL`.
/// 3. `SCALE2` must not be zero (it divides drawing coordinates downstream).
/// 4. Slab thickness must decrease from centre to edge to tip.
///
/// Numeric rules only fire when every value they compare parses; values that
/// do not parse are reported by [`check_field`] instead.
pub fn perform_client_side_validation(params: &ParameterSet) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for key in REQUIRED_PARAMETERS {
        if params.get(key).map_or(true, str::is_empty) {
            errors.push(ValidationError::for_field(*key, format!("{} is required", key)));
        }
    }

    if let (Some(top), Some(soffit)) = (params.number("TOPRL"), params.number("SOFL")) {
        if top <= soffit {
            errors.push(ValidationError::for_form(TOP_BELOW_SOFFIT));
        }
    }

    if params.number("SCALE2") == Some(0.0) {
        errors.push(ValidationError::for_form(SCALE2_ZERO));
    }

    if let (Some(center), Some(edge), Some(tip)) =
        (params.number("SLBTHC"), params.number("SLBTHE"), params.number("SLBTHT"))
    {
        if center <= edge {
            errors.push(ValidationError::for_form(SLAB_CENTER_NOT_ABOVE_EDGE));
        }
        if edge <= tip {
            errors.push(ValidationError::for_form(SLAB_EDGE_NOT_ABOVE_TIP));
        }
    }

    tracing::debug!(parameters = params.len(), errors = errors.len(), "client-side validation");
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_set() -> ParameterSet {
        [
            ("SCALE1", "100"),
            ("SCALE2", "100"),
            ("LBRIDGE", "30000"),
            ("NSPAN", "1"),
            ("TOPRL", "110000"),
            ("SOFL", "108000"),
            ("CCBR", "7500"),
        ]
        .into_iter()
        .collect()
    }

    fn messages(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_complete_set_passes() {
        assert!(perform_client_side_validation(&complete_set()).is_empty());
    }

    #[test]
    fn test_each_missing_required_key_reported_once() {
        for key in REQUIRED_PARAMETERS {
            let mut params = complete_set();
            params.remove(key);
            let errors = perform_client_side_validation(&params);
            let expected = format!("{} is required", key);

            assert_eq!(errors.iter().filter(|e| e.message == expected).count(), 1);
            for other in REQUIRED_PARAMETERS.iter().filter(|k| *k != key) {
                assert!(!errors.iter().any(|e| e.message == format!("{} is required", other)));
            }
        }
    }

    #[test]
    fn test_empty_required_value_reported() {
        let mut params = complete_set();
        params.insert("CCBR", "");
        let errors = perform_client_side_validation(&params);
        assert_eq!(messages(&errors), vec!["CCBR is required"]);
        assert_eq!(errors[0].field.as_deref(), Some("CCBR"));
    }

    #[test]
    fn test_whitespace_required_value_is_present() {
        let mut params = complete_set();
        params.insert("CCBR", "  ");
        let errors = perform_client_side_validation(&params);
        assert!(!messages(&errors).contains(&"CCBR is required"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_top_level_must_exceed_soffit() {
        let mut params = complete_set();
        params.insert("TOPRL", "10");
        params.insert("SOFL", "10");
        assert!(messages(&perform_client_side_validation(&params)).contains(&TOP_BELOW_SOFFIT));

        params.insert("TOPRL", "11");
        assert!(!messages(&perform_client_side_validation(&params)).contains(&TOP_BELOW_SOFFIT));
    }

    #[test]
    fn test_scale2_zero_guard() {
        let mut params = complete_set();
        params.insert("SCALE2", "0");
        assert!(messages(&perform_client_side_validation(&params)).contains(&SCALE2_ZERO));

        params.insert("SCALE2", "0.0");
        assert!(messages(&perform_client_side_validation(&params)).contains(&SCALE2_ZERO));

        params.insert("SCALE2", "2");
        assert!(!messages(&perform_client_side_validation(&params)).contains(&SCALE2_ZERO));
    }

    #[test]
    fn test_slab_thickness_ordering() {
        let mut params = complete_set();
        params.insert("SLBTHC", "300");
        params.insert("SLBTHE", "200");
        params.insert("SLBTHT", "100");
        assert!(perform_client_side_validation(&params).is_empty());

        params.insert("SLBTHC", "200");
        params.insert("SLBTHE", "300");
        assert_eq!(messages(&perform_client_side_validation(&params)), vec![SLAB_CENTER_NOT_ABOVE_EDGE]);

        params.insert("SLBTHC", "100");
        params.insert("SLBTHE", "100");
        params.insert("SLBTHT", "100");
        assert_eq!(
            messages(&perform_client_side_validation(&params)),
            vec![SLAB_CENTER_NOT_ABOVE_EDGE, SLAB_EDGE_NOT_ABOVE_TIP]
        );
    }

    #[test]
    fn test_slab_rule_needs_all_three_values() {
        let mut params = complete_set();
        params.insert("SLBTHC", "100");
        params.insert("SLBTHE", "300");
        assert!(perform_client_side_validation(&params).is_empty());
    }

    #[test]
    fn test_unparsable_numbers_skip_cross_field_rules() {
        let mut params = complete_set();
        params.insert("TOPRL", "abc");
        params.insert("SCALE2", "zero");
        assert!(perform_client_side_validation(&params).is_empty());
    }

    #[test]
    fn test_errors_accumulate_in_rule_order() {
        let params: ParameterSet = [("TOPRL", "1"), ("SOFL", "2"), ("SCALE2", "0")].into_iter().collect();
        let errors = perform_client_side_validation(&params);
        let msgs = messages(&errors);
        assert_eq!(
            msgs,
            vec![
                "SCALE1 is required",
                "LBRIDGE is required",
                "NSPAN is required",
                "CCBR is required",
                TOP_BELOW_SOFFIT,
                SCALE2_ZERO,
            ]
        );
    }

    #[test]
    fn test_check_field_rule_order() {
        let c = FieldConstraints {
            required: true,
            kind: Some(ValueKind::Float),
            min: Some(100.0),
            max: Some(200.0),
        };
        assert_eq!(check_field("abc", &c), Err(FIELD_NOT_A_NUMBER.to_string()));
        assert_eq!(check_field("50", &c), Err("Minimum value is 100".to_string()));
        assert_eq!(check_field("250", &c), Err("Maximum value is 200".to_string()));
        assert_eq!(check_field("   ", &c), Err(FIELD_REQUIRED.to_string()));
        assert_eq!(check_field("150", &c), Ok(()));
        assert_eq!(check_field("200", &c), Ok(()));
    }

    #[test]
    fn test_check_field_optional_empty_passes() {
        let c = FieldConstraints {
            required: false,
            kind: Some(ValueKind::Float),
            min: Some(1.0),
            max: Some(2.0),
        };
        assert_eq!(check_field("", &c), Ok(()));
    }

    #[test]
    fn test_check_field_integer_kind() {
        let c = FieldConstraints {
            required: true,
            kind: Some(ValueKind::Int),
            min: Some(1.0),
            max: Some(20.0),
        };
        assert_eq!(check_field("1.5", &c), Err("Enter a valid integer".to_string()));
        assert_eq!(check_field("two", &c), Err("Enter a valid integer".to_string()));
        assert_eq!(check_field("3", &c), Ok(()));
        assert_eq!(check_field("3.0", &c), Ok(()));
        assert_eq!(check_field("0", &c), Err("Minimum value is 1".to_string()));
    }

    #[test]
    fn test_check_field_fractional_bounds() {
        let c = FieldConstraints {
            required: false,
            kind: Some(ValueKind::Float),
            min: Some(0.0),
            max: Some(0.5),
        };
        assert_eq!(check_field("0.6", &c), Err("Maximum value is 0.5".to_string()));
    }

    #[test]
    fn test_remote_verdict_conversion() {
        let verdict: RemoteVerdict = serde_json::from_str(r#"{"valid": false, "errors": ["Bad span"]}"#).unwrap();
        let outcome = ValidationOutcome::from(verdict);
        assert!(!outcome.valid);
        assert_eq!(outcome.messages().collect::<Vec<_>>(), vec!["Bad span"]);

        let verdict: RemoteVerdict = serde_json::from_str(r#"{"valid": true}"#).unwrap();
        assert_eq!(ValidationOutcome::from(verdict), ValidationOutcome::valid());
    }

    #[test]
    fn test_validation_error_taxonomy() {
        let field = ValidationError::for_field("SCALE1", "SCALE1 is required");
        assert_eq!(field.to_error().error_code(), "FIELD_CONSTRAINT");
        let form = ValidationError::for_form(SCALE2_ZERO);
        assert_eq!(form.to_error().error_code(), "CROSS_FIELD");
    }
}

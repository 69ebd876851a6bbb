//! # Form Controller
//!
//! [`FormController`] owns the [`FormModel`] and runs the validation and
//! submission lifecycle. Every operation is a synchronous state transition
//! that returns the [`Effect`]s the hosting shell must carry out (arm a timer,
//! call the server, ask for confirmation). Results come back through the
//! matching `finish_*` / `*_settled` methods.
//!
//! ## Lifecycle
//!
//! ```text
//! field_input ──► ScheduleFieldSettle ──► field_settled ──► validate_single_field
//! validate_parameters ──► client rules ──┬─► errors shown (no request)
//!                                        └─► RemoteValidate ──► finish_remote_validation
//! handle_form_submit ──► client rules ──┬─► errors shown, submission cancelled
//!                                       └─► Submit ──► finish_submission
//! request_reset ──► ConfirmReset ──► reset_to_defaults
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::controller::{Effect, FormController};
//! use bridge_core::settings::FormSettings;
//!
//! let mut controller = FormController::with_bridge_parameters(FormSettings::default());
//!
//! let effects = controller.validate_parameters();
//! assert!(matches!(effects.as_slice(), [Effect::RemoteValidate(_)]));
//!
//! // A second request while the first is outstanding does nothing
//! assert!(controller.validate_parameters().is_empty());
//! ```

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::client::OutputFormat;
use crate::debounce::{Cancel, Debouncer};
use crate::errors::BridgeResult;
use crate::form::{Emphasis, FormModel, Toast, ToastId, ToastKind, UiState};
use crate::parameter_set::ParameterSet;
use crate::settings::FormSettings;
use crate::validation::{check_field, perform_client_side_validation, ValidationOutcome};

pub const RESET_DONE: &str = "Parameters reset to defaults";
pub const FIX_BEFORE_GENERATING: &str = "Please fix validation errors before generating";
pub const RESET_PROMPT: &str = "Are you sure you want to reset all parameters to default values?";

/// Work the shell performs on the controller's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm the trailing-edge settle timer for a field, then call
    /// [`FormController::arm_settle_timer`] with its handle
    ScheduleFieldSettle { key: String, delay: Duration },
    /// Call [`FormController::expire_toast`] after the delay
    ScheduleToastExpiry { id: ToastId, delay: Duration },
    /// POST the set to the validation endpoint, then call
    /// [`FormController::finish_remote_validation`]
    RemoteValidate(ParameterSet),
    /// Submit the form, then call [`FormController::finish_submission`]
    Submit { parameters: ParameterSet, format: OutputFormat },
    /// Ask the user to confirm, then call [`FormController::reset_to_defaults`]
    ConfirmReset,
    /// Put text on the clipboard, then call
    /// [`crate::clipboard::clipboard_write_finished`]
    WriteClipboard(String),
}

pub type Effects = Vec<Effect>;

/// Orchestrates validation and submission for one parameter form
#[derive(Debug)]
pub struct FormController {
    form: FormModel,
    settings: FormSettings,
    /// Set while a validation round-trip is outstanding
    validating: bool,
    /// Whether the last known outcome allows generation
    generate_allowed: bool,
    submitting: Option<OutputFormat>,
    timers: Debouncer<String>,
}

impl FormController {
    pub fn new(form: FormModel, settings: FormSettings) -> Self {
        FormController {
            form,
            settings,
            validating: false,
            generate_allowed: true,
            submitting: None,
            timers: Debouncer::new(),
        }
    }

    /// Controller over the full bridge parameter form
    pub fn with_bridge_parameters(settings: FormSettings) -> Self {
        FormController::new(FormModel::bridge_parameters(), settings)
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn is_validating(&self) -> bool {
        self.validating
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }

    /// Snapshot of every field value, in form order
    pub fn collect_form_data(&self) -> ParameterSet {
        self.form.parameter_set()
    }

    // ===== Field events =====

    /// Write a value without validating it.
    ///
    /// Returns `false` when no field has that key.
    pub fn set_field_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.form.field_mut(key) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Keystroke in a field: store the value and ask for a settle timer
    pub fn field_input(&mut self, key: &str, value: impl Into<String>) -> Effects {
        if !self.set_field_value(key, value) {
            return Vec::new();
        }
        vec![Effect::ScheduleFieldSettle {
            key: key.to_string(),
            delay: self.settings.debounce(),
        }]
    }

    /// Track the timer scheduled for a field, cancelling the one it replaces
    pub fn arm_settle_timer(&mut self, key: &str, handle: Box<dyn Cancel + Send>) {
        self.timers.arm(key.to_string(), handle);
    }

    /// A field's quiet period elapsed
    pub fn field_settled(&mut self, key: &str) {
        self.timers.settle(&key.to_string());
        self.validate_single_field(key);
    }

    /// Focus left a field: validate it immediately
    pub fn field_blur(&mut self, key: &str) {
        self.validate_single_field(key);
    }

    pub fn has_pending_timer(&self, key: &str) -> bool {
        self.timers.is_pending(&key.to_string())
    }

    /// Check one field against its constraints and decorate it.
    ///
    /// Returns whether the field passed, or `None` for an unknown key.
    pub fn validate_single_field(&mut self, key: &str) -> Option<bool> {
        let field = self.form.field_mut(key)?;
        match check_field(&field.value, &field.constraints) {
            Ok(()) => {
                field.ui = UiState::Valid;
                Some(true)
            }
            Err(message) => {
                tracing::debug!(field = key, %message, "field constraint violated");
                field.ui = UiState::Invalid(message);
                Some(false)
            }
        }
    }

    // ===== Validation round-trip =====

    /// Validate the whole form: client rules first, then the server.
    ///
    /// A call while a round-trip is outstanding is ignored.
    pub fn validate_parameters(&mut self) -> Effects {
        if self.validating {
            tracing::debug!("validation already in flight");
            return Vec::new();
        }

        self.validating = true;
        self.form.validate_button.start_loading(None);
        self.set_generate_allowed(false);

        let parameters = self.collect_form_data();
        self.form.results.visible = true;

        let errors = perform_client_side_validation(&parameters);
        if !errors.is_empty() {
            self.display_validation_results(ValidationOutcome::invalid(errors));
            self.form.validate_button.stop_loading();
            self.validating = false;
            return Vec::new();
        }

        vec![Effect::RemoteValidate(parameters)]
    }

    /// Apply the result of the remote validation request
    pub fn finish_remote_validation(&mut self, result: BridgeResult<ValidationOutcome>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "validation request failed");
                ValidationOutcome::remote_failure()
            }
        };

        self.set_generate_allowed(outcome.valid);
        self.display_validation_results(outcome);
        self.form.validate_button.stop_loading();
        self.validating = false;
    }

    fn display_validation_results(&mut self, outcome: ValidationOutcome) {
        self.form.results.visible = true;
        self.form.results.outcome = Some(outcome);
        self.form.results.shown_at = Some(Utc::now());
    }

    /// Update whether generation is allowed; a loading button stays disabled
    fn set_generate_allowed(&mut self, allowed: bool) {
        self.generate_allowed = allowed;
        let button = &mut self.form.generate_button;
        button.emphasis = if allowed { Emphasis::Primary } else { Emphasis::Secondary };
        if !button.is_loading() {
            button.enabled = allowed;
        }
    }

    // ===== Submission =====

    /// Final client-side check before the form is submitted.
    ///
    /// On failure the submission is cancelled and the errors are shown.
    /// Nothing happens while the generate action is disabled.
    pub fn handle_form_submit(&mut self, format: OutputFormat) -> Effects {
        if !self.form.generate_button.enabled {
            return Vec::new();
        }

        let parameters = self.collect_form_data();
        let errors = perform_client_side_validation(&parameters);

        if !errors.is_empty() {
            self.set_generate_allowed(false);
            self.display_validation_results(ValidationOutcome::invalid(errors));
            return self.show_toast(FIX_BEFORE_GENERATING, ToastKind::Error);
        }

        tracing::info!(%format, parameters = parameters.len(), "submitting form");
        self.form.generate_button.start_loading(Some(format.loading_label()));
        self.submitting = Some(format);
        vec![Effect::Submit { parameters, format }]
    }

    /// The submission finished (drawing delivered or request failed).
    ///
    /// A result with no submission in flight is ignored.
    pub fn finish_submission(&mut self, result: BridgeResult<()>) -> Effects {
        let Some(format) = self.submitting.take() else {
            tracing::warn!("submission result without a pending submission");
            return Vec::new();
        };
        self.form.generate_button.stop_loading();
        self.form.generate_button.enabled = self.generate_allowed;

        match result {
            Ok(()) => self.show_toast(format!("Bridge {} generated successfully!", format), ToastKind::Success),
            Err(e) => {
                tracing::warn!(error = %e, "drawing generation failed");
                self.show_toast(format!("Error generating bridge: {}", e), ToastKind::Error)
            }
        }
    }

    // ===== Reset =====

    /// Ask for confirmation before resetting
    pub fn request_reset(&self) -> Effects {
        vec![Effect::ConfirmReset]
    }

    /// Restore declared defaults and clear all validation feedback.
    ///
    /// Call only after the user confirmed. Does not re-validate. A submission
    /// in flight keeps the generate button loading until it finishes.
    pub fn reset_to_defaults(&mut self) -> Effects {
        for field in &mut self.form.fields {
            if let Some(default) = &field.default_value {
                field.value = default.clone();
            }
            field.ui = UiState::Neutral;
        }
        self.timers.cancel_all();

        self.form.results.visible = false;

        self.set_generate_allowed(true);

        tracing::info!("parameters reset to defaults");
        self.show_toast(RESET_DONE, ToastKind::Success)
    }

    // ===== Toasts =====

    /// Show a toast that expires after the configured lifetime
    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) -> Effects {
        let id = Uuid::new_v4();
        self.form.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
        });
        vec![Effect::ScheduleToastExpiry {
            id,
            delay: self.settings.toast_lifetime(),
        }]
    }

    /// Remove a toast; `false` if it was already gone
    pub fn expire_toast(&mut self, id: ToastId) -> bool {
        let before = self.form.toasts.len();
        self.form.toasts.retain(|t| t.id != id);
        self.form.toasts.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::tests::FlagHandle;
    use crate::errors::BridgeError;
    use crate::form::{FieldState, ToastKind};
    use crate::validation::{ValidationError, REMOTE_FAILURE, SCALE2_ZERO, TOP_BELOW_SOFFIT};

    fn controller() -> FormController {
        FormController::with_bridge_parameters(FormSettings::default())
    }

    fn toast_messages(c: &FormController) -> Vec<&str> {
        c.form().toasts.iter().map(|t| t.message.as_str()).collect()
    }

    #[test]
    fn test_collect_form_data_reads_every_field() {
        let c = controller();
        let params = c.collect_form_data();
        assert_eq!(params.len(), c.form().fields.len());
        assert_eq!(params.get("LBRIDGE"), Some("30000"));
    }

    #[test]
    fn test_collect_form_data_only_has_present_fields() {
        let c = FormController::new(FormModel::new(vec![FieldState::text("NOTE", "Note")]), FormSettings::default());
        let params = c.collect_form_data();
        assert_eq!(params.len(), 1);
        assert!(!params.contains_key("LBRIDGE"));
    }

    #[test]
    fn test_single_field_min_max_required() {
        let mut c = controller();

        c.set_field_value("NSPAN", "0");
        assert_eq!(c.validate_single_field("NSPAN"), Some(false));
        assert_eq!(c.form().field("NSPAN").unwrap().ui.error_text(), "Minimum value is 1");

        c.set_field_value("NSPAN", "11");
        c.validate_single_field("NSPAN");
        assert_eq!(c.form().field("NSPAN").unwrap().ui.error_text(), "Maximum value is 10");

        c.set_field_value("NSPAN", "");
        c.validate_single_field("NSPAN");
        assert_eq!(c.form().field("NSPAN").unwrap().ui.error_text(), "This field is required");

        c.set_field_value("NSPAN", "3");
        c.validate_single_field("NSPAN");
        assert_eq!(c.form().field("NSPAN").unwrap().ui, UiState::Valid);

        assert_eq!(c.validate_single_field("NOPE"), None);
    }

    #[test]
    fn test_field_input_schedules_settle_timer() {
        let mut c = controller();
        let effects = c.field_input("TOPRL", "95000");
        assert_eq!(
            effects,
            vec![Effect::ScheduleFieldSettle {
                key: "TOPRL".to_string(),
                delay: Duration::from_millis(500),
            }]
        );
        assert_eq!(c.form().field("TOPRL").unwrap().value, "95000");
        assert_eq!(c.form().field("TOPRL").unwrap().ui, UiState::Neutral);

        assert!(c.field_input("NOPE", "1").is_empty());
    }

    #[test]
    fn test_keystrokes_replace_pending_timer() {
        let mut c = controller();
        let first = FlagHandle::default();
        let second = FlagHandle::default();

        c.field_input("SCALE1", "1");
        c.arm_settle_timer("SCALE1", Box::new(first.clone()));
        c.field_input("SCALE1", "10");
        c.arm_settle_timer("SCALE1", Box::new(second.clone()));

        assert!(first.cancelled());
        assert!(!second.cancelled());

        c.field_settled("SCALE1");
        assert!(!c.has_pending_timer("SCALE1"));
        assert_eq!(c.form().field("SCALE1").unwrap().ui, UiState::Valid);
    }

    #[test]
    fn test_blur_validates_immediately() {
        let mut c = controller();
        c.field_input("SCALE2", "5000");
        c.field_blur("SCALE2");
        assert_eq!(
            c.form().field("SCALE2").unwrap().ui,
            UiState::Invalid("Maximum value is 1000".to_string())
        );
    }

    #[test]
    fn test_validate_parameters_guards_reentry() {
        let mut c = controller();
        let first = c.validate_parameters();
        let second = c.validate_parameters();

        let requests = first
            .iter()
            .chain(second.iter())
            .filter(|e| matches!(e, Effect::RemoteValidate(_)))
            .count();
        assert_eq!(requests, 1);
        assert!(c.is_validating());
        assert!(c.form().validate_button.is_loading());
        assert!(!c.form().generate_button.enabled);
        assert!(c.form().results.visible);
    }

    #[test]
    fn test_client_errors_skip_remote_call() {
        let mut c = controller();
        c.set_field_value("SCALE2", "0");
        c.set_field_value("TOPRL", "100000");
        c.set_field_value("SOFL", "100000");

        let effects = c.validate_parameters();
        assert!(effects.is_empty());
        assert!(!c.is_validating());
        assert!(!c.form().validate_button.is_loading());
        assert!(!c.form().generate_button.enabled);

        let outcome = c.form().results.outcome.as_ref().unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.messages().collect::<Vec<_>>(), vec![TOP_BELOW_SOFFIT, SCALE2_ZERO]);

        // Field decorations are left alone by the bulk check
        assert_eq!(c.form().field("SCALE2").unwrap().ui, UiState::Neutral);
    }

    #[test]
    fn test_remote_valid_enables_generation() {
        let mut c = controller();
        c.validate_parameters();
        c.finish_remote_validation(Ok(ValidationOutcome::valid()));

        assert!(!c.is_validating());
        assert!(c.form().generate_button.enabled);
        assert_eq!(c.form().generate_button.emphasis, Emphasis::Primary);
        assert_eq!(c.form().validate_button.label, "Validate Parameters");
        assert_eq!(c.form().results.status_text(), "All parameters are valid");
        assert!(c.form().results.shown_at.is_some());
    }

    #[test]
    fn test_remote_invalid_disables_generation() {
        let mut c = controller();
        c.validate_parameters();
        c.finish_remote_validation(Ok(ValidationOutcome::invalid(vec![ValidationError::for_form(
            "Left abutment footing level should be at or above foundation level",
        )])));

        assert!(!c.form().generate_button.enabled);
        assert_eq!(c.form().generate_button.emphasis, Emphasis::Secondary);
        assert_eq!(c.form().results.outcome.as_ref().unwrap().errors.len(), 1);
    }

    #[test]
    fn test_remote_failure_shows_generic_error_and_allows_retry() {
        let mut c = controller();
        c.set_field_value("LBRIDGE", "1");
        c.validate_single_field("LBRIDGE");
        let decorated = c.form().field("LBRIDGE").unwrap().ui.clone();

        c.validate_parameters();
        c.finish_remote_validation(Err(BridgeError::remote_validation("connection refused")));

        let outcome = c.form().results.outcome.as_ref().unwrap();
        assert_eq!(outcome.messages().collect::<Vec<_>>(), vec![REMOTE_FAILURE]);
        assert!(!c.form().generate_button.enabled);
        assert_eq!(c.form().field("LBRIDGE").unwrap().ui, decorated);

        assert_eq!(c.validate_parameters().len(), 1);
    }

    #[test]
    fn test_submit_with_errors_is_cancelled() {
        let mut c = controller();
        c.set_field_value("SLBTHC", "200");
        c.set_field_value("SLBTHE", "300");

        let effects = c.handle_form_submit(OutputFormat::Dxf);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Submit { .. })));
        assert!(matches!(effects.as_slice(), [Effect::ScheduleToastExpiry { .. }]));
        assert!(c.form().results.visible);
        assert_eq!(toast_messages(&c), vec![FIX_BEFORE_GENERATING]);
        assert_eq!(c.form().toasts[0].kind, ToastKind::Error);
        assert!(!c.form().generate_button.enabled);
    }

    #[test]
    fn test_submit_proceeds_and_finishes() {
        let mut c = controller();
        let effects = c.handle_form_submit(OutputFormat::Pdf);
        match effects.as_slice() {
            [Effect::Submit { parameters, format }] => {
                assert_eq!(*format, OutputFormat::Pdf);
                assert_eq!(parameters.get("SCALE1"), Some("100"));
            }
            other => panic!("unexpected effects: {:?}", other),
        }
        assert!(c.is_submitting());
        assert_eq!(c.form().generate_button.label, "Generating PDF...");
        assert!(!c.form().generate_button.enabled);

        // Button is disabled while the submission runs
        assert!(c.handle_form_submit(OutputFormat::Pdf).is_empty());

        c.finish_submission(Ok(()));
        assert!(!c.is_submitting());
        assert!(c.form().generate_button.enabled);
        assert_eq!(c.form().generate_button.label, "Generate Drawing");
        assert_eq!(toast_messages(&c), vec!["Bridge PDF generated successfully!"]);
    }

    #[test]
    fn test_submission_failure_toasts_error() {
        let mut c = controller();
        c.handle_form_submit(OutputFormat::Dxf);
        c.finish_submission(Err(BridgeError::submission("Server returned 500")));
        assert_eq!(c.form().toasts[0].kind, ToastKind::Error);
        assert!(c.form().generate_button.enabled);
    }

    #[test]
    fn test_reset_requires_confirmation_effect() {
        let c = controller();
        assert_eq!(c.request_reset(), vec![Effect::ConfirmReset]);
    }

    #[test]
    fn test_reset_restores_defaults_and_clears_feedback() {
        let mut c = controller();
        let timer = FlagHandle::default();

        c.field_input("LBRIDGE", "1");
        c.arm_settle_timer("LBRIDGE", Box::new(timer.clone()));
        c.set_field_value("TOPRL", "1");
        c.validate_single_field("TOPRL");
        c.validate_parameters();
        c.finish_remote_validation(Ok(ValidationOutcome::invalid(vec![])));
        assert!(!c.form().generate_button.enabled);

        let effects = c.reset_to_defaults();
        assert!(matches!(effects.as_slice(), [Effect::ScheduleToastExpiry { .. }]));

        for field in &c.form().fields {
            assert_eq!(Some(&field.value), field.default_value.as_ref(), "{}", field.key);
            assert_eq!(field.ui, UiState::Neutral);
        }
        assert!(timer.cancelled());
        assert!(!c.form().results.visible);
        assert!(c.form().generate_button.enabled);
        assert_eq!(c.form().generate_button.emphasis, Emphasis::Primary);
        assert_eq!(toast_messages(&c), vec![RESET_DONE]);
    }

    #[test]
    fn test_reset_during_submission_keeps_generate_locked() {
        let mut c = controller();
        assert_eq!(c.handle_form_submit(OutputFormat::Dxf).len(), 1);

        c.reset_to_defaults();
        assert!(c.is_submitting());
        assert!(c.form().generate_button.is_loading());
        assert!(!c.form().generate_button.enabled);

        let effects = c.handle_form_submit(OutputFormat::Pdf);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Submit { .. })));

        c.finish_submission(Ok(()));
        assert!(!c.is_submitting());
        assert!(c.form().generate_button.enabled);
        assert_eq!(c.form().generate_button.label, "Generate Drawing");
        assert!(toast_messages(&c).contains(&"Bridge DXF generated successfully!"));
    }

    #[test]
    fn test_stray_submission_result_ignored() {
        let mut c = controller();
        assert!(c.finish_submission(Ok(())).is_empty());
        assert!(c.form().toasts.is_empty());
        assert!(c.form().generate_button.enabled);
    }

    #[test]
    fn test_integer_field_rejects_fraction() {
        let mut c = controller();
        c.set_field_value("NSPAN", "1.5");
        assert_eq!(c.validate_single_field("NSPAN"), Some(false));
        assert_eq!(
            c.form().field("NSPAN").unwrap().ui,
            UiState::Invalid("Enter a valid integer".to_string())
        );

        c.set_field_value("LBRIDGE", "30000.5");
        assert_eq!(c.validate_single_field("LBRIDGE"), Some(true));
    }

    #[test]
    fn test_reset_keeps_fields_without_default() {
        let mut form = FormModel::bridge_parameters();
        form.fields.push(FieldState::text("NOTE", "Note"));
        let mut c = FormController::new(form, FormSettings::default());
        c.set_field_value("NOTE", "keep me");
        c.reset_to_defaults();
        assert_eq!(c.form().field("NOTE").unwrap().value, "keep me");
    }

    #[test]
    fn test_toasts_expire() {
        let mut c = controller();
        let effects = c.show_toast("Hello", ToastKind::Info);
        let Effect::ScheduleToastExpiry { id, delay } = effects[0].clone() else {
            panic!("expected toast expiry");
        };
        assert_eq!(delay, Duration::from_secs(5));
        assert!(c.form().toast(id).is_some());

        assert!(c.expire_toast(id));
        assert!(!c.expire_toast(id));
        assert!(c.form().toasts.is_empty());
    }
}

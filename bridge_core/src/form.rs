//! # Form Document Model
//!
//! The state a front end renders: one [`FieldState`] per parameter input, the
//! action buttons, the validation results panel and the toast stack. The
//! controller is the only writer; shells read it to draw.
//!
//! ## Structure
//!
//! ```text
//! FormModel
//! ├── fields: Vec<FieldState> (form order)
//! ├── validate_button / generate_button: ButtonState
//! ├── results: ResultsPanel (visible, outcome, shown_at)
//! └── toasts: Vec<Toast>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parameter_set::ParameterSet;
use crate::parameters::{ParameterDefinition, ParameterGroup, PARAMETER_DEFINITIONS};
use crate::validation::{FieldConstraints, ValidationOutcome};

/// Visual validation state of one input
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message")]
pub enum UiState {
    #[default]
    Neutral,
    Valid,
    /// Invalid with the inline error text
    Invalid(String),
}

impl UiState {
    /// Inline error text, empty unless invalid
    pub fn error_text(&self) -> &str {
        match self {
            UiState::Invalid(message) => message,
            _ => "",
        }
    }

    pub fn is_decorated(&self) -> bool {
        !matches!(self, UiState::Neutral)
    }
}

/// One parameter input of the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    /// Element identifier and submitted name, e.g. `"LBRIDGE"`
    pub key: String,
    pub label: String,
    pub unit: String,
    /// Help text shown next to the input; empty when there is none
    pub description: String,
    pub constraints: FieldConstraints,
    /// Value declared by the form markup, restored on reset
    pub default_value: Option<String>,
    pub value: String,
    pub ui: UiState,
}

impl FieldState {
    /// Build an input from its catalogue definition, holding the default value
    pub fn from_definition(def: &ParameterDefinition) -> Self {
        let default = def.default_text();
        FieldState {
            key: def.key.to_string(),
            label: def.name.to_string(),
            unit: def.unit.to_string(),
            description: def.description.to_string(),
            constraints: FieldConstraints::from_definition(def),
            default_value: Some(default.clone()),
            value: default,
            ui: UiState::Neutral,
        }
    }

    /// Free text input without a declared default
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        FieldState {
            key: key.into(),
            label: label.into(),
            unit: String::new(),
            description: String::new(),
            constraints: FieldConstraints::default(),
            default_value: None,
            value: String::new(),
            ui: UiState::Neutral,
        }
    }
}

/// Visual weight of an action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    Primary,
    Secondary,
}

/// State of an action button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub enabled: bool,
    pub label: String,
    pub emphasis: Emphasis,
    /// Label to restore once a loading state ends
    saved_label: Option<String>,
}

impl ButtonState {
    pub fn new(label: impl Into<String>, emphasis: Emphasis) -> Self {
        ButtonState {
            enabled: true,
            label: label.into(),
            emphasis,
            saved_label: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.saved_label.is_some()
    }

    /// Disable and relabel while work is in flight.
    ///
    /// Nested calls keep the first saved label.
    pub fn start_loading(&mut self, text: Option<&str>) {
        if self.saved_label.is_none() {
            self.saved_label = Some(self.label.clone());
        }
        self.enabled = false;
        self.label = text.unwrap_or("Processing...").to_string();
    }

    /// Re-enable and restore the original label
    pub fn stop_loading(&mut self) {
        self.enabled = true;
        if let Some(label) = self.saved_label.take() {
            self.label = label;
        }
    }
}

/// Aggregate validation results area
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultsPanel {
    pub visible: bool,
    pub outcome: Option<ValidationOutcome>,
    pub shown_at: Option<DateTime<Utc>>,
}

impl ResultsPanel {
    /// Headline for the current outcome
    pub fn status_text(&self) -> &'static str {
        match &self.outcome {
            Some(o) if o.valid => "All parameters are valid",
            Some(_) => "Validation errors found",
            None => "",
        }
    }
}

pub type ToastId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

/// Complete document model of the parameter form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormModel {
    pub fields: Vec<FieldState>,
    pub validate_button: ButtonState,
    pub generate_button: ButtonState,
    pub results: ResultsPanel,
    pub toasts: Vec<Toast>,
}

impl FormModel {
    /// Form holding the given inputs, with both actions enabled
    pub fn new(fields: Vec<FieldState>) -> Self {
        FormModel {
            fields,
            validate_button: ButtonState::new("Validate Parameters", Emphasis::Secondary),
            generate_button: ButtonState::new("Generate Drawing", Emphasis::Primary),
            results: ResultsPanel::default(),
            toasts: Vec::new(),
        }
    }

    /// Form with every catalogued parameter, grouped in display order
    pub fn bridge_parameters() -> Self {
        let mut fields: Vec<FieldState> = ParameterGroup::ALL
            .iter()
            .flat_map(|g| g.definitions())
            .map(FieldState::from_definition)
            .collect();

        // Catalogue entries outside every display group still get an input
        for def in PARAMETER_DEFINITIONS {
            if ParameterGroup::of(def.key).is_none() {
                fields.push(FieldState::from_definition(def));
            }
        }

        FormModel::new(fields)
    }

    pub fn field(&self, key: &str) -> Option<&FieldState> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Current values of every input, in form order
    pub fn parameter_set(&self) -> ParameterSet {
        self.fields.iter().map(|f| (f.key.clone(), f.value.clone())).collect()
    }

    pub fn toast(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }
}

//! # bridge_core - Bridge Parameter Form Engine
//!
//! `bridge_core` is the framework-agnostic heart of the bridge drawing form.
//! It owns the parameter catalogue, the client-side validation rules and the
//! controller that sequences live field checks, remote validation, drawing
//! submission, reset and clipboard transfer. Front ends (Iced GUI, terminal)
//! only render the [`form::FormModel`] and carry out the [`controller::Effect`]s
//! the controller hands back.
//!
//! ## Design Philosophy
//!
//! - **Synchronous transitions**: controller operations mutate state and return
//!   effects; async work lives in the shells
//! - **JSON-First**: parameter sets, outcomes and errors are serializable
//! - **Rich Errors**: structured [`BridgeError`] variants, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_core::{FormController, FormSettings};
//!
//! let mut controller = FormController::with_bridge_parameters(FormSettings::default());
//! controller.field_input("NSPAN", "12");
//! controller.field_blur("NSPAN");
//!
//! let field = controller.form().field("NSPAN").unwrap();
//! assert_eq!(field.ui.error_text(), "Maximum value is 10");
//! ```
//!
//! ## Modules
//!
//! - [`parameters`] - Parameter catalogue and display groups
//! - [`parameter_set`] - Ordered name → value mapping sent to the server
//! - [`validation`] - Field and cross-field rules, validation outcomes
//! - [`form`] - Document model rendered by the front ends
//! - [`controller`] - Validation and submission lifecycle
//! - [`debounce`] - Per-field settle timers
//! - [`clipboard`] - JSON import/export of parameter values
//! - [`client`] - HTTP client for the drawing server
//! - [`settings`] - Timing and endpoint configuration
//! - [`errors`] - Structured error types

pub mod client;
pub mod clipboard;
pub mod controller;
pub mod debounce;
pub mod errors;
pub mod form;
pub mod parameter_set;
pub mod parameters;
pub mod settings;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use client::{DrawingClient, GeneratedDrawing, OutputFormat};
pub use controller::{Effect, Effects, FormController};
pub use errors::{BridgeError, BridgeResult};
pub use form::{FormModel, ToastKind, UiState};
pub use parameter_set::ParameterSet;
pub use settings::{resolve_settings, FormSettings};
pub use validation::{perform_client_side_validation, ValidationError, ValidationOutcome};

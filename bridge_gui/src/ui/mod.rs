//! UI module for the bridge parameter form
//!
//! # Panel Structure
//! - `toolbar` - Header, validate/generate actions, reset, clipboard copy/paste
//! - `parameter_panel` - Left: grouped parameter inputs with inline errors
//! - `results_panel` - Right: aggregate validation outcome
//! - `status_bar` - Bottom: toasts and save status
//! - `modal` - Reset confirmation overlay

pub mod modal;
pub mod parameter_panel;
pub mod results_panel;
pub mod status_bar;
pub mod toolbar;

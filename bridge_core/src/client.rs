//! # Drawing Server Client
//!
//! Talks to the two server endpoints the form depends on:
//!
//! - `POST /validate-parameters` - JSON body, JSON verdict back
//! - `POST /generate-dxf` | `/generate-pdf` - urlencoded form body, drawing
//!   file back (the plain form submission)
//!
//! The client is cheap to clone so shells can move it into async tasks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BridgeError, BridgeResult};
use crate::parameter_set::ParameterSet;
use crate::settings::FormSettings;
use crate::validation::{RemoteVerdict, ValidationOutcome};

/// Drawing file format requested on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Dxf,
    Pdf,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] = &[OutputFormat::Dxf, OutputFormat::Pdf];

    /// Endpoint path that generates this format
    pub fn endpoint(&self) -> &'static str {
        match self {
            OutputFormat::Dxf => "/generate-dxf",
            OutputFormat::Pdf => "/generate-pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dxf => "dxf",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Button text while the drawing is being generated
    pub fn loading_label(&self) -> &'static str {
        match self {
            OutputFormat::Dxf => "Generating DXF...",
            OutputFormat::Pdf => "Generating PDF...",
        }
    }

    /// Parse `"dxf"` / `"pdf"` (case-insensitive)
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dxf" => Some(OutputFormat::Dxf),
            "pdf" => Some(OutputFormat::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Dxf => "DXF",
            OutputFormat::Pdf => "PDF",
        })
    }
}

/// Drawing returned by a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDrawing {
    pub format: OutputFormat,
    /// Suggested file name, e.g. `bridge_drawing.dxf`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the drawing server
#[derive(Debug, Clone)]
pub struct DrawingClient {
    http: reqwest::Client,
    base_url: String,
}

impl DrawingClient {
    /// Build a client for `base_url` with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("BridgeForm/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(DrawingClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &FormSettings) -> BridgeResult<Self> {
        DrawingClient::new(settings.server_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ask the server to validate a parameter set.
    ///
    /// The body is read as JSON whatever the status code; the server answers
    /// validation failures with a verdict, not an HTTP error.
    ///
    /// # Returns
    ///
    /// * `Ok(ValidationOutcome)` - The server's verdict
    /// * `Err(BridgeError::RemoteValidation)` - Transport failure or a body
    ///   that is not a verdict
    pub async fn validate(&self, params: &ParameterSet) -> BridgeResult<ValidationOutcome> {
        let response = self
            .http
            .post(self.url("/validate-parameters"))
            .json(params)
            .send()
            .await
            .map_err(|e| BridgeError::remote_validation(format!("Network error: {}", e)))?;

        let status = response.status();
        let verdict: RemoteVerdict = response.json().await.map_err(|e| {
            BridgeError::remote_validation(format!("Failed to parse response ({}): {}", status, e))
        })?;

        tracing::info!(valid = verdict.valid, errors = verdict.errors.len(), "remote validation verdict");
        Ok(verdict.into())
    }

    /// Submit the form to generate a drawing.
    ///
    /// A server that rejects the parameters redirects back to its HTML form,
    /// so an HTML body counts as a rejection.
    pub async fn generate(&self, params: &ParameterSet, format: OutputFormat) -> BridgeResult<GeneratedDrawing> {
        let response = self
            .http
            .post(self.url(format.endpoint()))
            .form(params)
            .send()
            .await
            .map_err(|e| BridgeError::submission(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::submission(format!("Server returned {}", status)));
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("text/html"))
            .unwrap_or(false);
        if is_html {
            return Err(BridgeError::submission(
                "The server rejected the parameters and returned to the form",
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BridgeError::submission(format!("Failed to read drawing: {}", e)))?;

        tracing::info!(%format, size = bytes.len(), "drawing generated");
        Ok(GeneratedDrawing {
            format,
            file_name: format!("bridge_drawing.{}", format.extension()),
            bytes: bytes.to_vec(),
        })
    }
}

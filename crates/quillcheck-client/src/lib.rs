//! Remote checker client.
//!
//! One outbound call: POST the document text and a fixed language code,
//! form-urlencoded, to a LanguageTool-compatible endpoint, and parse the JSON
//! `matches` list into [`MatchRecord`]s. The service reports match positions
//! in characters; records carry byte offsets, so positions are converted
//! against the sent text here, at the wire boundary, before anything slices
//! with them. Failures are typed but deliberately
//! undifferentiated downstream: the session logs them and keeps its previous
//! match state, with no retry and no user-visible error.

mod wire;

use quillcheck_engine::MatchRecord;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("check service returned {status}")]
    Status { status: reqwest::StatusCode },

    #[error("malformed check response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Blocking HTTP client for the grammar-check service. Cheap to share; the
/// CLI dispatches each check from a short-lived worker thread so the
/// interaction loop never blocks on the network.
pub struct CheckClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    language: String,
}

impl CheckClient {
    pub fn new(endpoint: &str, language: &str) -> Result<Self, CheckError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CheckError::Build)?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            language: language.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `text` for checking and parse the response into match records.
    pub fn check(&self, text: &str) -> Result<Vec<MatchRecord>, CheckError> {
        tracing::debug!(bytes = text.len(), endpoint = %self.endpoint, "dispatching check");
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .map_err(|source| CheckError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Status { status });
        }

        let body = response.text().map_err(|source| CheckError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        parse_matches(&body, text)
    }
}

/// Parse a response body into match records, resolving the service's
/// character offsets into byte offsets against `text` (the content that was
/// sent). Pure, so the wire handling is testable without a live service.
pub fn parse_matches(body: &str, text: &str) -> Result<Vec<MatchRecord>, CheckError> {
    let response: wire::CheckResponse = serde_json::from_str(body)?;
    Ok(response
        .matches
        .into_iter()
        .map(|m| m.into_record(text))
        .collect())
}

//! Zero-Shot Classifier
//!
//! Model-backed strategy: scores the description against all candidate
//! labels on a zero-shot text-classification inference endpoint and picks
//! the top label. Non-deterministic across model versions; callers must
//! not depend on which strategy is active.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{Category, ClassifyError};

/// Zero-shot pipeline request body.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    candidate_labels: Vec<&'static str>,
}

/// Zero-shot pipeline response. `labels` is sorted by descending score,
/// so the first entry is the model's pick.
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    labels: Vec<String>,
}

/// Model-backed classification engine.
///
/// Every failure mode (network, non-2xx status, malformed body, out-of-set
/// label) surfaces as a `ClassifyError` for the trigger to log; nothing
/// here touches the store.
pub struct ZeroShotClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl ZeroShotClassifier {
    /// `timeout` bounds the whole inference call; there is no retry.
    /// Construction happens once at startup, so a broken TLS/client setup
    /// panics there rather than running with an unbounded client.
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, client }
    }

    pub async fn classify(&self, description: &str) -> Result<Category, ClassifyError> {
        let request = InferenceRequest {
            inputs: description,
            parameters: InferenceParameters {
                candidate_labels: Category::ALL.iter().map(|c| c.as_str()).collect(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifyError::Server(response.status().as_u16()));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))?;

        Self::top_label(&parsed)
    }

    /// Take the top-scoring label and parse it into the fixed set.
    ///
    /// A top label outside the set is a contract violation. It is rejected
    /// here so it can never be persisted.
    fn top_label(response: &InferenceResponse) -> Result<Category, ClassifyError> {
        let top = response
            .labels
            .first()
            .ok_or_else(|| ClassifyError::Parse("empty labels array".to_string()))?;

        Category::parse(top).ok_or_else(|| ClassifyError::OutOfSet(top.clone()))
    }
}

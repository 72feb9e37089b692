//! Scripted mock provider for deterministic tests.
//!
//! Each call to `generate` pops the next scripted outcome from the queue.
//! Everything downstream of a fixed response sequence is deterministic, so
//! loop tests replay exact state and observation sequences against it.

use async_trait::async_trait;
use reagent_core::error::ProviderError;
use reagent_core::transcript::Transcript;
use std::sync::Mutex;

/// One scripted model outcome.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Return this text as the model's output.
    Text(String),
    /// Fail the call with this error.
    Fail(ProviderError),
}

/// A mock provider that returns a sequence of scripted responses.
///
/// Panics if more calls are made than responses provided — a test that
/// over-calls the model is a broken test.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ScriptedResponse>>,
    call_count: Mutex<usize>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// A provider that returns the given texts, one per call.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| ScriptedResponse::Text((*t).to_string()))
                .collect(),
        )
    }

    /// A provider whose first (and only) call fails.
    pub fn failing(error: ProviderError) -> Self {
        Self::new(vec![ScriptedResponse::Fail(error)])
    }

    /// How many times `generate` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl reagent_core::Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn generate(&self, _transcript: &Transcript) -> Result<String, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "ScriptedProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let response = responses[*count].clone();
        *count += 1;

        match response {
            ScriptedResponse::Text(t) => Ok(t),
            ScriptedResponse::Fail(e) => Err(e),
        }
    }
}

//! Provider trait — the abstraction over the language-model backend.
//!
//! A provider knows how to send a transcript to a model and get generated
//! text back. The loop controller calls `generate()` without knowing which
//! backend is behind it — pure polymorphism, and the seam where tests
//! substitute a scripted mock.
//!
//! The contract is deliberately narrow: synchronous request/response, a
//! text-valued result, and typed failure ([`ProviderError`]) distinct from
//! an empty-but-successful result. The loop treats both failure and empty
//! output as fatal to the current query.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::transcript::Transcript;

/// The core Provider trait.
///
/// Implementations: the Gemini HTTP client, and the scripted mock used by
/// loop tests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate the next model response from the full transcript.
    ///
    /// The transcript is the sole input — the provider must not carry
    /// conversational state of its own between calls.
    async fn generate(
        &self,
        transcript: &Transcript,
    ) -> std::result::Result<String, ProviderError>;
}

//! Model client implementations for reagent.
//!
//! - [`GeminiProvider`] — Gemini `generateContent` REST client
//! - [`ScriptedProvider`] — deterministic queue-backed mock for tests

pub mod gemini;
pub mod mock;

pub use gemini::GeminiProvider;
pub use mock::ScriptedProvider;

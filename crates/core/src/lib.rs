//! # Reagent Core
//!
//! Domain types, traits, and error definitions for the reagent ReAct runtime.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The runtime drives a language model through a reason → act → observe cycle.
//! Everything the loop touches is defined here as a value type or a trait:
//!
//! - [`Transcript`] — the append-only conversation log, the single source of
//!   truth for every model call and the audit trail returned to the caller
//! - [`Capability`] / [`CapabilityRegistry`] — named callables the model may
//!   invoke as actions
//! - [`Provider`] — the model client seam, so the loop never knows which
//!   backend it is talking to
//!
//! Implementations live in their respective crates; all crates depend inward
//! on core.

pub mod capability;
pub mod error;
pub mod provider;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use capability::{ArgValue, Capability, CapabilityRegistry, ParamKind, ParamSpec};
pub use error::{CapabilityError, Error, ProviderError, Result};
pub use provider::Provider;
pub use transcript::{Observation, Role, Transcript, TranscriptId, Turn};

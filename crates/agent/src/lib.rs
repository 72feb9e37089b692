//! The ReAct loop — reason, act, observe.
//!
//! This crate turns a provider and a capability registry into an agent:
//! the model reasons in text, names a single capability invocation per
//! turn, and reads the observation fed back before reasoning again. The
//! transcript is the loop's only state; every turn it accumulates is
//! returned to the caller whole.
//!
//! Module layout mirrors the loop's phases:
//! - [`prompt`] assembles the instruction prompt the model sees first
//! - [`parser`] classifies each model response (answer, action, malformed)
//! - [`dispatch`] parses and executes an action line against the registry
//! - [`runner`] drives the iterations and enforces the budget

pub mod dispatch;
pub mod parser;
pub mod prompt;
pub mod runner;

pub use parser::ParsedStep;
pub use runner::{ReactAgent, RunOutcome, RunReport};

//! The loop controller.
//!
//! Drives reason → act → observe until the model answers, the iteration
//! budget runs out, the provider fails, or the caller cancels. The
//! budget is checked before every model call and charges both dispatched
//! actions and malformed turns, so a run makes at most `ttl + 1` model
//! calls no matter how the model behaves.

use reagent_core::capability::CapabilityRegistry;
use reagent_core::transcript::{Transcript, Turn};
use reagent_core::{Provider, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::dispatch;
use crate::parser::{self, ParsedStep};
use crate::prompt;

const DEFAULT_TTL: u32 = 10;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The model produced a final answer.
    Answered { answer: String },
    /// The iteration budget was exhausted before an answer.
    BudgetExhausted,
    /// The provider failed or returned an empty response.
    ModelError { reason: String },
    /// The caller cancelled the run.
    Cancelled,
}

impl RunOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, RunOutcome::Answered { .. })
    }
}

/// The result of one query: outcome plus the full transcript.
///
/// The transcript is returned whole regardless of outcome — it is the
/// audit trail of everything the model said and observed.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub transcript: Transcript,
    /// Number of actions dispatched. Malformed turns are charged against
    /// the budget but do not count here.
    pub iterations: u32,
}

/// The ReAct agent: a provider, a capability registry, and a budget.
pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    registry: Arc<CapabilityRegistry>,
    ttl: u32,
    cancel: Arc<AtomicBool>,
}

impl ReactAgent {
    pub fn new(provider: Arc<dyn Provider>, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            provider,
            registry,
            ttl: DEFAULT_TTL,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the iteration budget.
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// A handle the caller can flip to stop the run before its next
    /// model call.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run one query to completion.
    pub async fn run(&self, query: &str) -> Result<RunReport> {
        let mut transcript = Transcript::new();
        let instruction = prompt::build_instruction(&self.registry.render_docs(), query)?;
        transcript.push(Turn::user(instruction));

        // Dispatched actions; reported to the caller and used for
        // ObservationN numbering.
        let mut iterations = 0u32;
        // Actions plus malformed turns; charged against the budget so a
        // model that never emits a valid action still terminates.
        let mut steps = 0u32;

        info!(
            transcript_id = %transcript.id,
            provider = self.provider.name(),
            ttl = self.ttl,
            "ReAct loop starting"
        );

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(iterations, "Run cancelled");
                return Ok(RunReport {
                    outcome: RunOutcome::Cancelled,
                    transcript,
                    iterations,
                });
            }

            if steps >= self.ttl {
                warn!(ttl = self.ttl, "Iteration budget exhausted");
                return Ok(RunReport {
                    outcome: RunOutcome::BudgetExhausted,
                    transcript,
                    iterations,
                });
            }

            let response = match self.provider.generate(&transcript).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Provider call failed");
                    return Ok(RunReport {
                        outcome: RunOutcome::ModelError {
                            reason: e.to_string(),
                        },
                        transcript,
                        iterations,
                    });
                }
            };

            if response.trim().is_empty() {
                warn!("Provider returned an empty response");
                return Ok(RunReport {
                    outcome: RunOutcome::ModelError {
                        reason: "empty response from model".into(),
                    },
                    transcript,
                    iterations,
                });
            }

            transcript.push(Turn::model(response.clone()));

            match parser::classify(&response) {
                ParsedStep::Answer { answer } => {
                    info!(iterations, "Final answer produced");
                    return Ok(RunReport {
                        outcome: RunOutcome::Answered { answer },
                        transcript,
                        iterations,
                    });
                }
                ParsedStep::Action { invocation } => {
                    iterations += 1;
                    steps += 1;
                    debug!(iteration = iterations, %invocation, "Dispatching action");
                    let observation =
                        dispatch::dispatch(&self.registry, &invocation, iterations).await;
                    transcript.push(observation.into_turn());
                }
                ParsedStep::Malformed => {
                    steps += 1;
                    warn!("Response contained no Answer or Action; continuing");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reagent_core::transcript::Role;
    use reagent_providers::ScriptedProvider;
    use reagent_core::error::ProviderError;
    use reagent_tools::default_registry;

    fn agent_with(provider: Arc<ScriptedProvider>, ttl: u32) -> ReactAgent {
        let registry = Arc::new(default_registry().unwrap());
        ReactAgent::new(provider, registry).with_ttl(ttl)
    }

    #[tokio::test]
    async fn two_actions_then_answer() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: First, I need to multiply 10 by 3.\nAction1: multiply_numbers(10, 3)",
            "Thought2: Now I add 10 to this result.\nAction2: add_numbers(30, 10)",
            "Thought3: I have the final result.\nAnswer: 10 * 3 + 10 is 40.",
        ]));
        let agent = agent_with(provider.clone(), 10);

        let report = agent.run("What is 10 * 3 + 10?").await.unwrap();

        assert!(matches!(
            &report.outcome,
            RunOutcome::Answered { answer } if answer.contains("40")
        ));
        assert_eq!(report.iterations, 2);
        assert_eq!(provider.call_count(), 3);

        let observations: Vec<&str> = report
            .transcript
            .observation_turns()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(observations, vec!["Observation1: 30", "Observation2: 40"]);

        // opening user turn + 3 model turns + 2 observations
        assert_eq!(report.transcript.len(), 6);
        assert_eq!(report.transcript.turns()[0].role, Role::User);
        assert!(report.transcript.turns()[0]
            .text
            .contains("Query: What is 10 * 3 + 10?"));
    }

    #[tokio::test]
    async fn budget_exhausted_when_model_never_answers() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: Let me compute something.\nAction1: add_numbers(1, 1)",
        ]));
        let agent = agent_with(provider.clone(), 1);

        let report = agent.run("Loop forever").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(report.iterations, 1);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_capability_feeds_error_observation_and_continues() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: I will use a tool I invented.\nAction1: unknown_tool(1)",
            "Thought2: That tool does not exist, I can answer directly.\nAnswer: done",
        ]));
        let agent = agent_with(provider, 10);

        let report = agent.run("q").await.unwrap();

        assert!(report.outcome.is_answered());
        assert_eq!(report.iterations, 1);
        let errors: Vec<&Turn> = report
            .transcript
            .observation_turns()
            .filter(|t| t.text.starts_with("Error:"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].text.contains("unknown_tool"));
    }

    #[tokio::test]
    async fn provider_failure_ends_the_run() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Network(
            "connection refused".into(),
        )));
        let agent = agent_with(provider, 10);

        let report = agent.run("q").await.unwrap();

        assert!(matches!(
            &report.outcome,
            RunOutcome::ModelError { reason } if reason.contains("connection refused")
        ));
        assert_eq!(report.iterations, 0);
        // Only the opening user turn; no model turn was appended.
        assert_eq!(report.transcript.len(), 1);
    }

    #[tokio::test]
    async fn empty_response_is_a_model_error() {
        let provider = Arc::new(ScriptedProvider::texts(&["   \n"]));
        let agent = agent_with(provider, 10);

        let report = agent.run("q").await.unwrap();

        assert!(matches!(
            &report.outcome,
            RunOutcome::ModelError { reason } if reason.contains("empty")
        ));
        assert_eq!(report.transcript.len(), 1);
    }

    #[tokio::test]
    async fn malformed_response_appends_no_observation_and_continues() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: I will just muse for a while without acting.",
            "Answer: fine, here is the answer",
        ]));
        let agent = agent_with(provider.clone(), 10);

        let report = agent.run("q").await.unwrap();

        assert!(report.outcome.is_answered());
        assert_eq!(report.iterations, 0);
        assert_eq!(report.transcript.observation_turns().count(), 0);
        // opening turn + 2 model turns, nothing else
        assert_eq!(report.transcript.len(), 3);
    }

    #[tokio::test]
    async fn malformed_turns_are_charged_against_the_budget() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: Musing only.",
            "Thought2: More musing.\nAction1: add_numbers(1, 2)",
        ]));
        let agent = agent_with(provider.clone(), 2);

        let report = agent.run("q").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(report.iterations, 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn cancel_before_first_model_call() {
        let provider = Arc::new(ScriptedProvider::texts(&["Answer: never reached"]));
        let agent = agent_with(provider.clone(), 10);
        agent.cancel_flag().store(true, Ordering::SeqCst);

        let report = agent.run("q").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(report.transcript.len(), 1);
    }

    #[tokio::test]
    async fn zero_ttl_exhausts_without_calling_the_model() {
        let provider = Arc::new(ScriptedProvider::texts(&["Answer: never reached"]));
        let agent = agent_with(provider.clone(), 0);

        let report = agent.run("q").await.unwrap();

        assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn capability_failure_becomes_error_observation() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Thought1: Dividing by zero seems fine.\nAction1: divide_numbers(1, 0)",
            "Thought2: It was not fine.\nAnswer: cannot divide by zero",
        ]));
        let agent = agent_with(provider, 10);

        let report = agent.run("q").await.unwrap();

        assert!(report.outcome.is_answered());
        let errors: Vec<&Turn> = report
            .transcript
            .observation_turns()
            .filter(|t| t.text.starts_with("Error:"))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].text.contains("division by zero"));
    }
}

//! `reagent ask` — run one query through the ReAct loop.

use reagent_agent::{ReactAgent, RunOutcome};
use reagent_config::AppConfig;
use reagent_core::transcript::Role;
use reagent_core::{Error, Result};
use reagent_providers::GeminiProvider;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::debug;

use crate::render;

/// Used when no query is given on the command line.
const DEMO_QUERY: &str =
    "What is the current temperature (in fahrenheit) in the city that won the Super Bowl in 1995?";

pub async fn run(query: Option<String>, max_iterations: Option<u32>) -> Result<()> {
    let config = AppConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })?;
    debug!(?config, "Loaded configuration");

    let Some(api_key) = config.api_key.clone() else {
        return Err(Error::Config {
            message: "no API key configured. Set GEMINI_API_KEY (or REAGENT_API_KEY), or add \
                      api_key to ~/.reagent/config.toml"
                .into(),
        });
    };

    let mut provider = GeminiProvider::new(
        api_key,
        config.default_model.clone(),
        config.request_timeout_secs,
    )?
    .with_temperature(config.default_temperature);
    if let Some(url) = &config.api_url {
        provider = provider.with_base_url(url);
    }

    let registry = reagent_tools::default_registry()?;
    let agent = ReactAgent::new(Arc::new(provider), Arc::new(registry))
        .with_ttl(max_iterations.unwrap_or(config.max_iterations));

    // Ctrl-C stops the run before its next model call; the transcript so
    // far is still printed.
    let cancel = agent.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let query = query.unwrap_or_else(|| DEMO_QUERY.to_string());
    println!("{}\n", render::query(&query));

    let report = agent.run(&query).await?;

    // Replay the trace: model turns, then the observations fed back.
    // The opening instruction turn is noise at the terminal, skip it.
    // The final model turn holds the answer and is rendered in green below.
    let turns = report.transcript.turns();
    let body = if report.outcome.is_answered() && turns.len() > 1 {
        &turns[1..turns.len() - 1]
    } else {
        &turns[1..]
    };
    for turn in body {
        match turn.role {
            Role::Model => println!("{}\n", render::model(turn.text.trim())),
            Role::User => println!("{}\n", render::observation(&turn.text)),
        }
    }

    match report.outcome {
        RunOutcome::Answered { .. } => {
            if let Some(last) = turns.last() {
                println!("{}", render::answer(last.text.trim()));
            }
        }
        RunOutcome::BudgetExhausted => {
            println!(
                "{}",
                render::terminate("Reached maximum number of iterations")
            );
        }
        RunOutcome::ModelError { reason } => {
            println!("{}", render::terminate(&format!("Model error: {reason}")));
        }
        RunOutcome::Cancelled => {
            println!("{}", render::terminate("Cancelled"));
        }
    }

    Ok(())
}

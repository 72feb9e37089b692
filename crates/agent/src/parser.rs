//! Model response classification.
//!
//! A model response is one of three things: a final answer, a single
//! action to dispatch, or neither. Classification is strict line-prefix
//! matching — no fuzzy recovery — so the model either follows the trace
//! format the prompt teaches or its turn is counted as malformed and the
//! loop moves on.

/// The classification of one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedStep {
    /// The model produced a final answer.
    Answer {
        /// Everything after the `Answer:` marker, trimmed.
        answer: String,
    },
    /// The model requested a capability invocation.
    Action {
        /// The invocation text after the `Action:` marker, e.g.
        /// `multiply_numbers(10, 3)`.
        invocation: String,
    },
    /// Neither an answer nor a well-formed action line.
    Malformed,
}

/// Classify a model response.
///
/// `Answer` takes precedence over `Action`: a response carrying both is
/// final. If several `Action` lines appear (a rule violation), the first
/// one wins and the rest are ignored. An `Action` line with no colon or
/// nothing after the colon is malformed.
pub fn classify(response: &str) -> ParsedStep {
    let lines: Vec<&str> = response.lines().map(str::trim).collect();

    for (idx, line) in lines.iter().enumerate() {
        if line.starts_with("Answer") {
            return ParsedStep::Answer {
                answer: extract_answer(&lines[idx..]),
            };
        }
    }

    for line in &lines {
        if line.starts_with("Action") {
            let Some((_, rest)) = line.split_once(':') else {
                return ParsedStep::Malformed;
            };
            let invocation = rest.trim();
            if invocation.is_empty() {
                return ParsedStep::Malformed;
            }
            return ParsedStep::Action {
                invocation: invocation.to_string(),
            };
        }
    }

    ParsedStep::Malformed
}

/// The answer is everything after the marker's colon on the answer line,
/// plus any following lines (answers often run to several sentences).
fn extract_answer(lines: &[&str]) -> String {
    let first = match lines[0].split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    };

    let mut parts = vec![first];
    parts.extend(lines[1..].iter().map(|l| l.to_string()));
    parts.join("\n").trim().to_string()
}

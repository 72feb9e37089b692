//! Instruction prompt assembly.
//!
//! The instruction prompt is the agent's rulebook: it teaches the model
//! the Thought/Action/Observation trace format, lists the registered
//! capabilities verbatim, and states the rules the parser depends on
//! (one action per turn, `Answer:` only when final). The tool section is
//! rendered from the registry at assembly time so the prompt never
//! drifts from what the dispatcher will actually accept.

use reagent_core::{Error, Result};

/// The slot the rendered capability docs are substituted into.
const TOOLS_SLOT: &str = "{tools}";

const INSTRUCTION_TEMPLATE: &str = r#"Use the following thinking trace pattern and tools to solve the problem in a number of steps.

# TOOLS
{tools}

# EXAMPLE THINKING TRACE
## INPUT
Query: What is 10 * 3 + 10?

Thought1: First, I need to multiply 10 by 3.
Action1: multiply_numbers(10, 3)

Observation1: 30

## OUTPUT
Thought2: Now I need to add 10 to this result.
Action2: add_numbers(30, 10)

# RULES
1. Do not make up observations. Observations should only be provided as input, never as output.
2. One action per turn. Do not make multiple tool calls or skip steps. Each response should only contain a single Thought, Action, or Answer.
3. Think out loud and feel free to be expressive and explain your thought process in each Thought. Each Thought should be a minimum of 3 sentences.
4. Denote the iteration of each step (as-in Thought1, Action1).
5. Tool arguments must be literal numbers or quoted strings. Never pass an expression or a tool call as an argument.
6. When you have the final answer, and ONLY then, use the format:
Answer: [your final answer]
7. When you have the final answer, rephrase the answer in the context of the original query, and briefly summarize the work you did, listing them as numbered steps.
8. If you cannot get the correct information from a tool, try different variations of the query. After 5 attempts, return an error.
9. Stick to the format as shown.
"#;

/// Assemble the full text of the opening user turn: instruction prompt
/// with the capability docs substituted in, followed by the query.
///
/// Fails loudly if the template has lost its tool slot — a prompt without
/// the capability list would send the model acting blind.
pub fn build_instruction(capability_docs: &str, query: &str) -> Result<String> {
    if !INSTRUCTION_TEMPLATE.contains(TOOLS_SLOT) {
        return Err(Error::Config {
            message: format!("instruction template is missing the {TOOLS_SLOT} slot"),
        });
    }

    let prompt = INSTRUCTION_TEMPLATE.replace(TOOLS_SLOT, capability_docs);
    Ok(format!("{prompt}\n# THINKING TRACE\n\nQuery: {query}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_are_substituted_into_tool_section() {
        let docs = "add_numbers(x: int, y: int)\nAdds two numbers.";
        let prompt = build_instruction(docs, "What is 2 + 2?").unwrap();
        assert!(prompt.contains("# TOOLS\nadd_numbers(x: int, y: int)"));
        assert!(!prompt.contains(TOOLS_SLOT));
    }

    #[test]
    fn query_is_appended_after_the_rules() {
        let prompt = build_instruction("", "Did more americans die in WW1 or WW2?").unwrap();
        let rules_at = prompt.find("# RULES").unwrap();
        let query_at = prompt
            .find("Query: Did more americans die in WW1 or WW2?")
            .unwrap();
        assert!(query_at > rules_at);
    }

    #[test]
    fn example_trace_teaches_the_format() {
        let prompt = build_instruction("", "q").unwrap();
        assert!(prompt.contains("Thought1:"));
        assert!(prompt.contains("Action1: multiply_numbers(10, 3)"));
        assert!(prompt.contains("Observation1: 30"));
        assert!(prompt.contains("Answer: [your final answer]"));
    }
}

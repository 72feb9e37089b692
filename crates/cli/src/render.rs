//! ANSI rendering for the terminal trace.
//!
//! Each role in the trace gets a fixed color: the query purple, model
//! reasoning blue, observations yellow, the final answer green, and
//! terminal failures red. Stateless helpers only — callers decide what
//! to print and when.

const QUERY: &str = "\x1b[95m";
const MODEL: &str = "\x1b[94m";
const OBSERVATION: &str = "\x1b[93m";
const ANSWER: &str = "\x1b[92m";
const TERMINATE: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

pub fn query(text: &str) -> String {
    format!("{QUERY}Query: {text}{RESET}")
}

pub fn model(text: &str) -> String {
    format!("{MODEL}{text}{RESET}")
}

pub fn observation(text: &str) -> String {
    format!("{OBSERVATION}{text}{RESET}")
}

pub fn answer(text: &str) -> String {
    format!("{ANSWER}{text}{RESET}")
}

pub fn terminate(text: &str) -> String {
    format!("{TERMINATE}Terminate: {text}{RESET}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_gets_its_color_and_resets() {
        assert_eq!(query("q"), "\x1b[95mQuery: q\x1b[0m");
        assert_eq!(model("m"), "\x1b[94mm\x1b[0m");
        assert_eq!(observation("o"), "\x1b[93mo\x1b[0m");
        assert_eq!(answer("Answer: a"), "\x1b[92mAnswer: a\x1b[0m");
        assert_eq!(
            terminate("Reached maximum number of iterations"),
            "\x1b[91mTerminate: Reached maximum number of iterations\x1b[0m"
        );
    }
}

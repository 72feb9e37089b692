//! Capability trait — the abstraction over the agent's callable actions.
//!
//! Capabilities are what give the agent the ability to act: do arithmetic,
//! look up the weather, search an encyclopedia. Each carries a declared
//! name, an ordered parameter signature, and a documentation string; the
//! registry uses all three both to render the tool section of the
//! instruction prompt and to validate dispatch requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CapabilityError;

/// The kind of a declared parameter.
///
/// Documentation only — binding is positional and the dispatcher performs
/// no coercion beyond what [`ArgValue`]'s accessors provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Int,
    Float,
    Str,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Int => write!(f, "int"),
            ParamKind::Float => write!(f, "float"),
            ParamKind::Str => write!(f, "str"),
        }
    }
}

/// One declared parameter: name plus kind, in signature order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A literal argument value parsed from a model-emitted invocation.
///
/// The dispatcher only ever extracts literals — numbers and strings —
/// never expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ArgValue {
    /// Numeric view. Integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Int(i) => Some(*i as f64),
            ArgValue::Float(f) => Some(*f),
            ArgValue::Str(_) => None,
        }
    }

    /// Integer view. Floats with no fractional part narrow to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            ArgValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(v) => write!(f, "{v}"),
            ArgValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// The core Capability trait.
///
/// Each capability (arithmetic ops, temperature lookup, encyclopedia
/// search) implements this trait. Capabilities are registered in the
/// [`CapabilityRegistry`] and invoked by the dispatcher with the literal
/// arguments parsed from the model's action line.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The unique name of this capability (e.g., "add_numbers").
    fn name(&self) -> &str;

    /// The ordered parameter signature.
    fn signature(&self) -> Vec<ParamSpec>;

    /// Documentation rendered into the instruction prompt.
    fn description(&self) -> &str;

    /// Invoke with positionally-bound literal arguments.
    ///
    /// Returns the rendered result text, or a descriptive error — never
    /// panics past this boundary.
    async fn invoke(&self, args: &[ArgValue]) -> std::result::Result<String, CapabilityError>;

    /// Render this capability's documentation block for the prompt:
    /// a `name(param: kind, ...)` line followed by the description.
    fn render_doc(&self) -> String {
        let params: Vec<String> = self
            .signature()
            .iter()
            .map(|p| format!("{}: {}", p.name, p.kind))
            .collect();
        format!(
            "{}({})\n{}",
            self.name(),
            params.join(", "),
            self.description()
        )
    }
}

/// A registry of available capabilities.
///
/// The loop controller uses this to:
/// 1. Render the tool documentation section of the instruction prompt
/// 2. Look up and invoke capabilities when the model requests an action
///
/// Registration order is preserved — the prompt lists capabilities in the
/// order they were registered. Duplicate names are rejected at
/// registration, so a finished registry is internally consistent.
pub struct CapabilityRegistry {
    capabilities: Vec<Box<dyn Capability>>,
    names: HashSet<String>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a capability. Fails fast if the name is already taken.
    pub fn register(
        &mut self,
        capability: Box<dyn Capability>,
    ) -> std::result::Result<(), CapabilityError> {
        let name = capability.name().to_string();
        if !self.names.insert(name.clone()) {
            return Err(CapabilityError::DuplicateName(name));
        }
        self.capabilities.push(capability);
        Ok(())
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.capabilities
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Whether a capability with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.capabilities.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Render one documentation block per capability, in registration
    /// order, for verbatim inclusion in the instruction prompt.
    pub fn render_docs(&self) -> String {
        self.capabilities
            .iter()
            .map(|c| c.render_doc())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test capability for unit tests.
    struct EchoCapability;

    #[async_trait]
    impl Capability for EchoCapability {
        fn name(&self) -> &str {
            "echo"
        }

        fn signature(&self) -> Vec<ParamSpec> {
            vec![ParamSpec::new("text", ParamKind::Str)]
        }

        fn description(&self) -> &str {
            "Echoes back the input."
        }

        async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
            let text = args
                .first()
                .and_then(|a| a.as_str())
                .ok_or_else(|| CapabilityError::InvalidArguments {
                    name: "echo".into(),
                    reason: "expected one string argument".into(),
                })?;
            Ok(text.to_string())
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability)).unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.contains("echo"));
    }

    #[test]
    fn registry_rejects_duplicate_names() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability)).unwrap();
        let err = registry.register(Box::new(EchoCapability)).unwrap_err();
        assert!(matches!(err, CapabilityError::DuplicateName(n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn docs_render_in_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability)).unwrap();
        let docs = registry.render_docs();
        assert!(docs.starts_with("echo(text: str)"));
        assert!(docs.contains("Echoes back the input."));
    }

    #[tokio::test]
    async fn invoke_through_registry() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(EchoCapability)).unwrap();
        let cap = registry.get("echo").unwrap();
        let out = cap.invoke(&[ArgValue::Str("hello".into())]).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn arg_value_accessors() {
        assert_eq!(ArgValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ArgValue::Float(2.0).as_i64(), Some(2));
        assert_eq!(ArgValue::Float(2.5).as_i64(), None);
        assert_eq!(ArgValue::Str("x".into()).as_f64(), None);
        assert_eq!(ArgValue::Str("x".into()).as_str(), Some("x"));
    }

    #[test]
    fn arg_value_display() {
        assert_eq!(ArgValue::Int(-4).to_string(), "-4");
        assert_eq!(ArgValue::Str("a b".into()).to_string(), "\"a b\"");
    }
}

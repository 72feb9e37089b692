//! Built-in capability implementations for reagent.
//!
//! Capabilities give the agent the ability to act: arithmetic, current
//! temperature lookup, and Wikipedia search/summary/coordinates. Each one
//! returns either a rendered result string or a descriptive error — never
//! an uncaught panic past the dispatcher's boundary.

pub mod arithmetic;
pub mod weather;
pub mod wikipedia;

use reagent_core::Result;
use reagent_core::capability::CapabilityRegistry;

pub use weather::TemperatureCapability;
pub use wikipedia::WikiClient;

/// Create the default capability registry with all built-in capabilities.
///
/// Registration order is what the instruction prompt will show the model.
pub fn default_registry() -> Result<CapabilityRegistry> {
    let wiki = WikiClient::default();

    let mut registry = CapabilityRegistry::new();
    registry.register(Box::new(arithmetic::AddNumbers))?;
    registry.register(Box::new(arithmetic::SubtractNumbers))?;
    registry.register(Box::new(arithmetic::MultiplyNumbers))?;
    registry.register(Box::new(arithmetic::DivideNumbers))?;
    registry.register(Box::new(TemperatureCapability::new()))?;
    registry.register(Box::new(wikipedia::SearchPage::new(wiki.clone())))?;
    registry.register(Box::new(wikipedia::PageCoordinates::new(wiki.clone())))?;
    registry.register(Box::new(wikipedia::PageSummary::new(wiki)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_capabilities() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 8);
        for name in [
            "add_numbers",
            "subtract_numbers",
            "multiply_numbers",
            "divide_numbers",
            "get_temperature",
            "search_wikipedia_page",
            "wikipedia_coordinates",
            "wikipedia_summary",
        ] {
            assert!(registry.contains(name), "missing capability: {name}");
        }
    }

    #[test]
    fn rendered_docs_cover_every_capability() {
        let registry = default_registry().unwrap();
        let docs = registry.render_docs();
        assert!(docs.contains("add_numbers(x: int, y: int)"));
        assert!(docs.contains("get_temperature(latitude: float, longitude: float)"));
        assert!(docs.contains("wikipedia_summary(query: str, sentences: int)"));
    }
}

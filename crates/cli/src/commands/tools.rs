//! `reagent tools` — list the registered capabilities.

use reagent_core::Result;

pub fn run() -> Result<()> {
    let registry = reagent_tools::default_registry()?;
    println!(
        "{} capabilities registered:\n\n{}",
        registry.len(),
        registry.render_docs()
    );
    Ok(())
}

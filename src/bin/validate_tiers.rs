//! Tier Validation Binary
//!
//! Validates a tiers.yaml file before it is handed to the dashboard:
//! - Checks keys are present, unique and not the reserved catch-all key
//! - Checks labels and keywords are non-empty after normalization
//! - Reports keywords that an earlier tier will always match first

use anyhow::{Context, Result};
use std::path::PathBuf;

use lead_dashboard::rules::{audit_tiers, load_tiers, validate_tiers};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Config/tiers.yaml"));

    println!("=== Tier Configuration Validator ===");

    let config = load_tiers(&path).context("Failed to load tier configuration")?;

    let errors = validate_tiers(&config.tiers);
    let warnings: Vec<String> = audit_tiers(&config.tiers)
        .iter()
        .map(ToString::to_string)
        .collect();

    if errors.is_empty() && warnings.is_empty() {
        println!("✓ All {} tiers are valid", config.tiers.len());
        return Ok(());
    }

    if !errors.is_empty() {
        println!("\n❌ ERRORS (must fix):");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    if !warnings.is_empty() {
        println!("\n⚠️  WARNINGS:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

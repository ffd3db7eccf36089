//! Bundled persona registry: default assumptions and descriptions per persona.

use super::types::{ParameterSet, PersonaKey};

/// Shown when a description is requested for a key the registry doesn't know.
pub const PLACEHOLDER_DESCRIPTION: &str =
    "Select a persona to see a short description and defaults.";

/// Persona used whenever a key cannot be resolved.
pub const FALLBACK_PERSONA: PersonaKey = PersonaKey::Saas;

/// Registry of persona presets.
///
/// The tables are compiled in and never change at runtime, so the registry
/// itself carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetRegistry;

impl PresetRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Canonical defaults for a persona.
    pub fn defaults(&self, key: PersonaKey) -> ParameterSet {
        match key {
            PersonaKey::Saas => preset(10000.0, 20.0, 5.0, 100.0, 0.06, 24.0),
            PersonaKey::Freemium => preset(7000.0, 10.0, 2.0, 500.0, 0.05, 18.0),
            PersonaKey::Ecommerce => preset(8000.0, 50.0, 30.0, 300.0, 0.04, 12.0),
            PersonaKey::Marketplace => preset(12000.0, 5.0, 2.0, 1000.0, 0.08, 12.0),
            PersonaKey::Consulting => preset(3000.0, 200.0, 20.0, 10.0, 0.03, 12.0),
            PersonaKey::Hardware => preset(25000.0, 300.0, 150.0, 50.0, 0.02, 24.0),
        }
    }

    /// Resolve a raw key, falling back to SaaS when it isn't recognized.
    pub fn resolve(&self, key: &str) -> PersonaKey {
        key.parse().unwrap_or(FALLBACK_PERSONA)
    }

    /// Defaults for a raw key. Unknown keys get the SaaS preset.
    pub fn get(&self, key: &str) -> ParameterSet {
        self.defaults(self.resolve(key))
    }

    /// Description for a raw key. Unknown keys get the generic placeholder.
    pub fn describe(&self, key: &str) -> &'static str {
        match key.parse::<PersonaKey>() {
            Ok(persona) => description(persona),
            Err(_) => PLACEHOLDER_DESCRIPTION,
        }
    }

    /// List all personas with their descriptions.
    pub fn list_available(&self) -> Vec<PersonaListing> {
        PersonaKey::all()
            .iter()
            .map(|key| PersonaListing {
                key: *key,
                description: description(*key),
                defaults: self.defaults(*key),
            })
            .collect()
    }
}

fn preset(
    fixed_costs: f64,
    price: f64,
    variable_cost: f64,
    initial_sales: f64,
    monthly_growth: f64,
    months: f64,
) -> ParameterSet {
    ParameterSet {
        fixed_costs,
        price,
        variable_cost,
        initial_sales,
        monthly_growth,
        months,
    }
}

fn description(key: PersonaKey) -> &'static str {
    match key {
        PersonaKey::Saas => {
            "SaaS: recurring revenue model, lower initial sales, steady growth and high lifetime value."
        }
        PersonaKey::Freemium => {
            "Freemium: many free users, small conversion to paid. Focuses on volume and conversion."
        }
        PersonaKey::Ecommerce => {
            "E-commerce: product sales with per-unit margins and faster turnover."
        }
        PersonaKey::Marketplace => {
            "Marketplace: high volume, low take-rate per transaction. Growth scales with network effects."
        }
        PersonaKey::Consulting => {
            "Consulting: small number of high-ticket clients with strong margins."
        }
        PersonaKey::Hardware => {
            "Hardware: large upfront costs and higher variable costs with slower growth."
        }
    }
}

/// Summary of an available persona.
#[derive(Debug, Clone)]
pub struct PersonaListing {
    pub key: PersonaKey,
    pub description: &'static str,
    pub defaults: ParameterSet,
}

//! Core types for the persona system.
//!
//! A persona is a named business-model template. Each one bundles the six
//! financial assumptions the simulator needs, keyed by [`ParamField`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona Key
// ─────────────────────────────────────────────────────────────────

/// The closed set of business personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKey {
    /// Recurring subscription revenue.
    Saas,
    /// Many free users, small paid conversion.
    Freemium,
    /// Product sales with per-unit margins.
    Ecommerce,
    /// Take-rate on transaction volume.
    Marketplace,
    /// Few high-ticket clients.
    Consulting,
    /// Upfront manufacturing costs.
    Hardware,
}

impl PersonaKey {
    /// Slug used in CLI args and config files.
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaKey::Saas => "saas",
            PersonaKey::Freemium => "freemium",
            PersonaKey::Ecommerce => "ecommerce",
            PersonaKey::Marketplace => "marketplace",
            PersonaKey::Consulting => "consulting",
            PersonaKey::Hardware => "hardware",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaKey::Saas => "SaaS",
            PersonaKey::Freemium => "Freemium",
            PersonaKey::Ecommerce => "E-commerce",
            PersonaKey::Marketplace => "Marketplace",
            PersonaKey::Consulting => "Consulting",
            PersonaKey::Hardware => "Hardware",
        }
    }

    /// All personas in selector order.
    pub fn all() -> &'static [PersonaKey] {
        &[
            PersonaKey::Saas,
            PersonaKey::Freemium,
            PersonaKey::Ecommerce,
            PersonaKey::Marketplace,
            PersonaKey::Consulting,
            PersonaKey::Hardware,
        ]
    }
}

impl Default for PersonaKey {
    fn default() -> Self {
        PersonaKey::Saas
    }
}

impl fmt::Display for PersonaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PersonaKey {
    type Err = String;

    /// Keys match their slug exactly: `"SaaS"` is not a key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saas" => Ok(PersonaKey::Saas),
            "freemium" => Ok(PersonaKey::Freemium),
            "ecommerce" => Ok(PersonaKey::Ecommerce),
            "marketplace" => Ok(PersonaKey::Marketplace),
            "consulting" => Ok(PersonaKey::Consulting),
            "hardware" => Ok(PersonaKey::Hardware),
            _ => Err(format!(
                "Unknown persona '{}'. Valid: saas, freemium, ecommerce, marketplace, consulting, hardware",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Parameter Field
// ─────────────────────────────────────────────────────────────────

/// The six recognized simulation parameters, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    FixedCosts,
    Price,
    VariableCost,
    InitialSales,
    MonthlyGrowth,
    Months,
}

impl ParamField {
    /// Wire name, as sent to the simulator.
    pub fn name(&self) -> &'static str {
        match self {
            ParamField::FixedCosts => "fixed_costs",
            ParamField::Price => "price",
            ParamField::VariableCost => "variable_cost",
            ParamField::InitialSales => "initial_sales",
            ParamField::MonthlyGrowth => "monthly_growth",
            ParamField::Months => "months",
        }
    }

    /// Caption text: the wire name with underscores replaced by spaces.
    pub fn label(&self) -> String {
        self.name().replace('_', " ")
    }

    /// Monetary fields are shown with a currency prefix and masked when idle.
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            ParamField::FixedCosts | ParamField::Price | ParamField::VariableCost
        )
    }

    /// Input step hint: fractional for the growth rate, whole units otherwise.
    pub fn step(&self) -> f64 {
        match self {
            ParamField::MonthlyGrowth => 0.01,
            _ => 1.0,
        }
    }

    /// All fields in declared order.
    pub fn all() -> &'static [ParamField] {
        &[
            ParamField::FixedCosts,
            ParamField::Price,
            ParamField::VariableCost,
            ParamField::InitialSales,
            ParamField::MonthlyGrowth,
            ParamField::Months,
        ]
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParamField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamField::all()
            .iter()
            .copied()
            .find(|f| f.name() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Unknown parameter '{}'. Valid: fixed_costs, price, variable_cost, initial_sales, monthly_growth, months",
                    s
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Parameter Set
// ─────────────────────────────────────────────────────────────────

/// A complete set of simulation assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Monthly fixed costs (currency).
    pub fixed_costs: f64,

    /// Price per unit (currency).
    pub price: f64,

    /// Variable cost per unit (currency).
    pub variable_cost: f64,

    /// Units sold in the first month.
    pub initial_sales: f64,

    /// Month-over-month growth as a fraction.
    pub monthly_growth: f64,

    /// Simulation horizon in months.
    pub months: f64,
}

impl ParameterSet {
    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::FixedCosts => self.fixed_costs,
            ParamField::Price => self.price,
            ParamField::VariableCost => self.variable_cost,
            ParamField::InitialSales => self.initial_sales,
            ParamField::MonthlyGrowth => self.monthly_growth,
            ParamField::Months => self.months,
        }
    }

    pub fn set(&mut self, field: ParamField, value: f64) {
        match field {
            ParamField::FixedCosts => self.fixed_costs = value,
            ParamField::Price => self.price = value,
            ParamField::VariableCost => self.variable_cost = value,
            ParamField::InitialSales => self.initial_sales = value,
            ParamField::MonthlyGrowth => self.monthly_growth = value,
            ParamField::Months => self.months = value,
        }
    }

    /// Field/value pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamField, f64)> + '_ {
        ParamField::all().iter().map(move |f| (*f, self.get(*f)))
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

//! Persona system: named business-model templates and their default assumptions.
//!
//! Each persona (SaaS, freemium, e-commerce, marketplace, consulting,
//! hardware) carries a complete [`ParameterSet`] and a short description.

pub mod registry;
pub mod types;

pub use registry::{PersonaListing, PresetRegistry};
pub use types::{ParamField, ParameterSet, PersonaKey};

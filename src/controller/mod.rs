//! Persona controller
//!
//! Owns the current selection and its preview, and turns host events into
//! panel updates and simulator navigation.

pub mod events;
pub mod state;

pub use events::PersonaEvents;
pub use state::{select_persona, ControllerState};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::persona::{ParamField, PersonaKey, PresetRegistry};
use crate::preview::{PreviewPanel, ValueFormatter};
use crate::transfer::{NavigationTarget, Navigator, ParameterTransfer, SubmitAction};

// ─────────────────────────────────────────────────────────────────
// Persona Controller
// ─────────────────────────────────────────────────────────────────

/// Event-driven controller for one launcher session.
pub struct PersonaController<N: Navigator> {
    registry: PresetRegistry,
    formatter: ValueFormatter,
    transfer: ParameterTransfer,
    state: ControllerState,
    navigator: N,
}

impl<N: Navigator> PersonaController<N> {
    /// Create a controller. `initial` is the pre-supplied persona key, if any;
    /// an unknown key falls back to SaaS.
    pub fn new(
        registry: PresetRegistry,
        formatter: ValueFormatter,
        transfer: ParameterTransfer,
        navigator: N,
        initial: Option<&str>,
    ) -> Self {
        let initial = initial
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                key.parse::<PersonaKey>().unwrap_or_else(|e| {
                    warn!(error = %e, "Initial persona not recognized, using SaaS");
                    registry.resolve(key)
                })
            });

        let state = ControllerState::initial(initial, &registry, &formatter);
        debug!(persona = %state.persona().slug(), "Controller initialized");

        Self {
            registry,
            formatter,
            transfer,
            state,
            navigator,
        }
    }

    pub fn persona(&self) -> PersonaKey {
        self.state.persona()
    }

    pub fn description(&self) -> &'static str {
        self.state.description()
    }

    pub fn panel(&self) -> Option<&PreviewPanel> {
        self.state.panel()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Remove one control from the preview, as if its element were missing.
    pub fn detach_field(&mut self, field: &str) -> bool {
        let Some(field) = self.parse_field(field) else {
            return false;
        };
        self.state
            .panel_mut()
            .map(|panel| panel.remove(field).is_some())
            .unwrap_or(false)
    }

    /// Remove the whole preview. Submits then use registry defaults.
    pub fn detach_preview(&mut self) {
        self.state = self.state.clone().without_panel();
    }

    fn parse_field(&self, name: &str) -> Option<ParamField> {
        match name.parse::<ParamField>() {
            Ok(field) => Some(field),
            Err(e) => {
                warn!(error = %e, "Ignoring event for unknown field");
                None
            }
        }
    }

    fn with_control(
        &mut self,
        field: &str,
        f: impl FnOnce(&mut PreviewPanel, ParamField) -> bool,
    ) -> bool {
        let Some(field) = self.parse_field(field) else {
            return false;
        };
        match self.state.panel_mut() {
            Some(panel) => {
                let handled = f(panel, field);
                if !handled {
                    debug!(field = %field, "No control for field");
                }
                handled
            }
            None => {
                debug!(field = %field, "No preview rendered");
                false
            }
        }
    }
}

impl<N: Navigator> PersonaEvents for PersonaController<N> {
    fn on_selection_change(&mut self, key: &str) {
        self.state = select_persona(self.state.clone(), key, &self.registry, &self.formatter);
        debug!(selection = ?self.state.selection(), "Selection changed");
    }

    fn on_focus_field(&mut self, field: &str) -> bool {
        self.with_control(field, |panel, field| panel.focus(field))
    }

    fn on_blur_field(&mut self, field: &str) -> bool {
        self.with_control(field, |panel, field| panel.blur(field))
    }

    fn on_input_field(&mut self, field: &str, text: &str) -> bool {
        self.with_control(field, |panel, field| panel.input(field, text))
    }

    fn on_submit(&mut self, action: SubmitAction) -> Result<NavigationTarget> {
        let parameters = self.transfer.collect(
            action,
            self.state.panel(),
            self.state.persona(),
            &self.registry,
        );
        let target = self.transfer.target(parameters);

        info!(
            action = ?action,
            persona = %self.state.persona().slug(),
            "Submitting parameters"
        );
        self.navigator.navigate(&target)?;
        Ok(target)
    }
}

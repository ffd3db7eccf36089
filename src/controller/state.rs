//! Controller-owned selection state and the pure selection transition.

use tracing::{debug, warn};

use crate::persona::registry::FALLBACK_PERSONA;
use crate::persona::{PersonaKey, PresetRegistry};
use crate::preview::{PreviewPanel, ValueFormatter};

// ─────────────────────────────────────────────────────────────────
// Controller State
// ─────────────────────────────────────────────────────────────────

/// Everything the controller knows about the current selection.
///
/// The panel is owned here and rebuilt from scratch on every selection, so
/// edits never leak from one persona into another.
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Explicit selection, `None` until the user picks something.
    selection: Option<PersonaKey>,

    /// Persona used when the selection is cleared.
    default_persona: PersonaKey,

    /// Persona the preview and description currently show.
    persona: PersonaKey,

    /// Description text for `persona`.
    description: &'static str,

    /// Rendered preview. `None` once the host has no preview area.
    panel: Option<PreviewPanel>,
}

impl ControllerState {
    /// Startup state: the caller's initial persona, or SaaS.
    pub fn initial(
        initial: Option<PersonaKey>,
        registry: &PresetRegistry,
        formatter: &ValueFormatter,
    ) -> Self {
        let persona = initial.unwrap_or(FALLBACK_PERSONA);
        Self {
            selection: initial,
            default_persona: persona,
            persona,
            description: registry.describe(persona.slug()),
            panel: Some(PreviewPanel::render(persona, registry, formatter)),
        }
    }

    pub fn selection(&self) -> Option<PersonaKey> {
        self.selection
    }

    pub fn persona(&self) -> PersonaKey {
        self.persona
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn panel(&self) -> Option<&PreviewPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut PreviewPanel> {
        self.panel.as_mut()
    }

    /// Drop the preview entirely. Later selections keep it absent.
    pub fn without_panel(mut self) -> Self {
        self.panel = None;
        self
    }
}

// ─────────────────────────────────────────────────────────────────
// Transition
// ─────────────────────────────────────────────────────────────────

/// Apply a selection change and return the new state.
///
/// An empty key clears the selection and shows the default persona. An
/// unrecognized key shows SaaS, for both preview and description.
pub fn select_persona(
    state: ControllerState,
    key: &str,
    registry: &PresetRegistry,
    formatter: &ValueFormatter,
) -> ControllerState {
    let key = key.trim();
    let (selection, persona) = if key.is_empty() {
        (None, state.default_persona)
    } else {
        let persona = match key.parse::<PersonaKey>() {
            Ok(persona) => persona,
            Err(_) => {
                warn!(key = %key, fallback = %FALLBACK_PERSONA.slug(), "Unknown persona, using fallback");
                registry.resolve(key)
            }
        };
        (Some(persona), persona)
    };

    debug!(persona = %persona.slug(), "Persona selected");

    let panel = state
        .panel
        .as_ref()
        .map(|_| PreviewPanel::render(persona, registry, formatter));

    ControllerState {
        selection,
        default_persona: state.default_persona,
        persona,
        description: registry.describe(persona.slug()),
        panel,
    }
}

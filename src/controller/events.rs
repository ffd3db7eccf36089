//! Host-facing event interface.
//!
//! Anything that can produce user events (the scripted session, the one-shot
//! CLI commands, tests) drives the controller through [`PersonaEvents`].

use crate::error::Result;
use crate::transfer::{NavigationTarget, SubmitAction};

/// Capabilities a host uses to drive the persona controller.
///
/// Field events take the wire name of the field. A name that matches no
/// control is ignored and reported as `false`.
pub trait PersonaEvents {
    /// The persona selector changed to `key` (possibly empty or unknown).
    fn on_selection_change(&mut self, key: &str);

    /// A preview control gained focus.
    fn on_focus_field(&mut self, field: &str) -> bool;

    /// A preview control lost focus.
    fn on_blur_field(&mut self, field: &str) -> bool;

    /// The user replaced a control's text.
    fn on_input_field(&mut self, field: &str, text: &str) -> bool;

    /// Start or demo was pressed. Returns where the host navigated.
    fn on_submit(&mut self, action: SubmitAction) -> Result<NavigationTarget>;

    /// Focus, type, and leave a control in one step.
    fn on_edit_field(&mut self, field: &str, text: &str) -> bool {
        if !self.on_focus_field(field) {
            return false;
        }
        self.on_input_field(field, text);
        self.on_blur_field(field)
    }
}

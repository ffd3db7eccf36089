//! Editable preview of a persona's parameters.
//!
//! The panel holds one [`FieldControl`] per parameter. Monetary controls are
//! masked (`"KES 7,000"`) while idle and unmasked (`"7000"`) while focused;
//! the other controls always hold a plain number.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{trace, warn};

use crate::persona::{ParamField, PersonaKey, PresetRegistry};

use super::formatter::ValueFormatter;

/// Values read out of the panel, keyed by field. Only present controls appear.
pub type HarvestedValues = BTreeMap<ParamField, f64>;

// ─────────────────────────────────────────────────────────────────
// Field Control
// ─────────────────────────────────────────────────────────────────

/// Which form a control's content is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEditState {
    /// Formatted and masked. Monetary controls only.
    Display,
    /// Plain numeric string, editable.
    Raw,
}

/// A single editable control, tagged with the field it edits.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldControl {
    field: ParamField,
    content: String,
    state: FieldEditState,
    /// Currency code affixed in front of monetary controls.
    prefix: Option<String>,
}

impl FieldControl {
    pub fn field(&self) -> ParamField {
        self.field
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> FieldEditState {
        self.state
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

// ─────────────────────────────────────────────────────────────────
// Preview Panel
// ─────────────────────────────────────────────────────────────────

/// The editable preview for one persona.
///
/// A panel is built for a single persona and thrown away when the selection
/// changes; nothing carries over between personas.
#[derive(Debug, Clone)]
pub struct PreviewPanel {
    persona: PersonaKey,
    controls: Vec<FieldControl>,
    formatter: ValueFormatter,
}

impl PreviewPanel {
    /// Build one control per parameter of `persona`, in declared order.
    pub fn render(
        persona: PersonaKey,
        registry: &PresetRegistry,
        formatter: &ValueFormatter,
    ) -> Self {
        let controls = registry
            .defaults(persona)
            .iter()
            .map(|(field, value)| {
                if field.is_monetary() {
                    FieldControl {
                        field,
                        content: formatter.to_display(value),
                        state: FieldEditState::Display,
                        prefix: Some(formatter.currency_code().to_string()),
                    }
                } else {
                    FieldControl {
                        field,
                        content: ValueFormatter::plain(value),
                        state: FieldEditState::Raw,
                        prefix: None,
                    }
                }
            })
            .collect();

        trace!(persona = %persona.slug(), "Preview panel rendered");

        Self {
            persona,
            controls,
            formatter: formatter.clone(),
        }
    }

    pub fn persona(&self) -> PersonaKey {
        self.persona
    }

    pub fn controls(&self) -> &[FieldControl] {
        &self.controls
    }

    pub fn control(&self, field: ParamField) -> Option<&FieldControl> {
        self.controls.iter().find(|c| c.field == field)
    }

    fn control_mut(&mut self, field: ParamField) -> Option<&mut FieldControl> {
        self.controls.iter_mut().find(|c| c.field == field)
    }

    fn control_with_formatter(
        &mut self,
        field: ParamField,
    ) -> Option<(&mut FieldControl, &ValueFormatter)> {
        let control = self.controls.iter_mut().find(|c| c.field == field)?;
        Some((control, &self.formatter))
    }

    /// Current content of a control, if present.
    pub fn content(&self, field: ParamField) -> Option<&str> {
        self.control(field).map(|c| c.content.as_str())
    }

    /// Focus gained: unmask a monetary control for editing.
    ///
    /// Returns `false` when the panel has no such control.
    pub fn focus(&mut self, field: ParamField) -> bool {
        let Some((control, formatter)) = self.control_with_formatter(field) else {
            return false;
        };
        if field.is_monetary() {
            control.content = formatter.unmask(&control.content);
            control.state = FieldEditState::Raw;
        }
        true
    }

    /// Focus lost: re-mask a monetary control with its current number.
    pub fn blur(&mut self, field: ParamField) -> bool {
        let Some((control, formatter)) = self.control_with_formatter(field) else {
            return false;
        };
        if field.is_monetary() {
            let raw = formatter.unmask(&control.content);
            let value = ValueFormatter::parse_number(&raw, field);
            control.content = formatter.to_display(value);
            control.state = FieldEditState::Display;
        }
        true
    }

    /// Replace a control's content, as typing would.
    pub fn input(&mut self, field: ParamField, text: &str) -> bool {
        let Some(control) = self.control_mut(field) else {
            return false;
        };
        control.content = text.to_string();
        true
    }

    /// Detach a control from the panel. Harvest then falls back to the
    /// registry for that field.
    pub fn remove(&mut self, field: ParamField) -> Option<FieldControl> {
        let index = self.controls.iter().position(|c| c.field == field)?;
        Some(self.controls.remove(index))
    }

    /// Caption shown beneath a control: `"fixed costs • KES 10,000"`.
    pub fn caption(&self, field: ParamField) -> Option<String> {
        let control = self.control(field)?;
        if field.is_monetary() {
            let raw = self.formatter.unmask(&control.content);
            let value = ValueFormatter::parse_number(&raw, field);
            Some(format!(
                "{} • {}",
                field.label(),
                self.formatter.to_display(value)
            ))
        } else {
            Some(field.label())
        }
    }

    /// Read every present control as a number.
    ///
    /// Content that doesn't parse is read as `0`, indistinguishable on the
    /// wire from a typed zero, so it is logged here.
    pub fn harvest(&self) -> HarvestedValues {
        self.controls
            .iter()
            .map(|control| {
                let raw = self.formatter.unmask(&control.content);
                let value = match ValueFormatter::try_parse_number(&raw, control.field) {
                    Some(v) => v,
                    None => {
                        warn!(
                            field = %control.field,
                            content = %control.content,
                            "Field content is not a number, sending 0"
                        );
                        0.0
                    }
                };
                (control.field, value)
            })
            .collect()
    }
}

impl fmt::Display for PreviewPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preview defaults: {}", self.persona)?;
        for control in self.controls() {
            let caption = self.caption(control.field).unwrap_or_default();
            let editing = control.field.is_monetary() && control.state() == FieldEditState::Raw;
            writeln!(
                f,
                "  {:<15} {:<4}[{}]  step {}  {}{}",
                control.field.name(),
                control.prefix().unwrap_or(""),
                control.content,
                control.field.step(),
                caption,
                if editing { "  (editing)" } else { "" }
            )?;
        }
        Ok(())
    }
}

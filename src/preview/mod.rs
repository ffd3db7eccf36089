//! Preview panel: editable controls for the selected persona's assumptions,
//! plus the value formatting that masks and unmasks monetary fields.

pub mod formatter;
pub mod panel;

pub use formatter::ValueFormatter;
pub use panel::{FieldControl, FieldEditState, HarvestedValues, PreviewPanel};

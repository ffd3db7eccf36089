//! Scripted launcher session
//!
//! Reads one event per line and feeds it to a [`PersonaController`]:
//!
//! ```text
//! # pick a persona and tweak it
//! select marketplace
//! edit price KES 7
//! show
//! start
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. `hide` drops the
//! whole preview, `remove <field>` drops one control.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::controller::{PersonaController, PersonaEvents};
use crate::error::{Error, Result};
use crate::transfer::{NavigationTarget, Navigator, SubmitAction};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Select(String),
    Focus(String),
    Blur(String),
    Input { field: String, text: String },
    Edit { field: String, text: String },
    Remove(String),
    Hide,
    Show,
    Start,
    Demo,
}

impl SessionCommand {
    /// Parse a script line. `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let command = match command.to_lowercase().as_str() {
            // An empty selection is meaningful: it clears the selector.
            "select" => SessionCommand::Select(rest.to_string()),
            "focus" => SessionCommand::Focus(required_field(rest, "focus", line_no)?),
            "blur" => SessionCommand::Blur(required_field(rest, "blur", line_no)?),
            "remove" => SessionCommand::Remove(required_field(rest, "remove", line_no)?),
            "input" => {
                let (field, text) = field_and_text(rest, "input", line_no)?;
                SessionCommand::Input { field, text }
            }
            "edit" => {
                let (field, text) = field_and_text(rest, "edit", line_no)?;
                SessionCommand::Edit { field, text }
            }
            "hide" => SessionCommand::Hide,
            "show" => SessionCommand::Show,
            "start" => SessionCommand::Start,
            "demo" => SessionCommand::Demo,
            other => {
                return Err(Error::session(
                    line_no,
                    format!("unknown command '{}'", other),
                ))
            }
        };

        Ok(Some(command))
    }
}

fn required_field(rest: &str, command: &str, line_no: usize) -> Result<String> {
    if rest.is_empty() {
        return Err(Error::session(
            line_no,
            format!("'{}' needs a field name", command),
        ));
    }
    Ok(rest.to_string())
}

/// Split `<field> <text>`. The text may contain spaces and may be empty.
fn field_and_text(rest: &str, command: &str, line_no: usize) -> Result<(String, String)> {
    let (field, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let field = required_field(field, command, line_no)?;
    Ok((field, text.trim().to_string()))
}

// ─────────────────────────────────────────────────────────────────
// Session Runner
// ─────────────────────────────────────────────────────────────────

/// Drives a controller from a script.
pub struct Session<'a, N: Navigator, W: Write> {
    controller: &'a mut PersonaController<N>,
    out: W,
}

impl<'a, N: Navigator, W: Write> Session<'a, N, W> {
    /// `out` receives the output of `show`. Navigation output goes through
    /// the controller's navigator.
    pub fn new(controller: &'a mut PersonaController<N>, out: W) -> Self {
        Self { controller, out }
    }

    /// Run every line of `script`. Stops at the first bad line.
    pub fn run<R: BufRead>(&mut self, script: R) -> Result<Vec<NavigationTarget>> {
        let mut targets = Vec::new();

        for (index, line) in script.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| Error::session(line_no, e.to_string()))?;
            let Some(command) = SessionCommand::parse(&line, line_no)? else {
                continue;
            };

            debug!(line = line_no, command = ?command, "Session event");
            if let Some(target) = self.apply(command, line_no)? {
                targets.push(target);
            }
        }

        Ok(targets)
    }

    fn apply(
        &mut self,
        command: SessionCommand,
        line_no: usize,
    ) -> Result<Option<NavigationTarget>> {
        let handled = match command {
            SessionCommand::Select(key) => {
                self.controller.on_selection_change(&key);
                true
            }
            SessionCommand::Focus(field) => self.controller.on_focus_field(&field),
            SessionCommand::Blur(field) => self.controller.on_blur_field(&field),
            SessionCommand::Input { field, text } => {
                self.controller.on_input_field(&field, &text)
            }
            SessionCommand::Edit { field, text } => self.controller.on_edit_field(&field, &text),
            SessionCommand::Remove(field) => self.controller.detach_field(&field),
            SessionCommand::Hide => {
                self.controller.detach_preview();
                true
            }
            SessionCommand::Show => {
                self.show(line_no)?;
                true
            }
            SessionCommand::Start => {
                return self.controller.on_submit(SubmitAction::Start).map(Some);
            }
            SessionCommand::Demo => {
                return self.controller.on_submit(SubmitAction::Demo).map(Some);
            }
        };

        if !handled {
            warn!(line = line_no, "Event had no effect");
        }
        Ok(None)
    }

    fn show(&mut self, line_no: usize) -> Result<()> {
        let rendered = match self.controller.panel() {
            Some(panel) => format!("{}\n{}", self.controller.description(), panel),
            None => format!("{}\n(no preview)\n", self.controller.description()),
        };
        self.out
            .write_all(rendered.as_bytes())
            .map_err(|e| Error::session(line_no, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::{ParamField, PresetRegistry};
    use crate::preview::ValueFormatter;
    use crate::transfer::{ParameterTransfer, RecordingNavigator};

    fn controller() -> PersonaController<RecordingNavigator> {
        PersonaController::new(
            PresetRegistry::new(),
            ValueFormatter::default(),
            ParameterTransfer::new("http://localhost:5000", "/simulator").unwrap(),
            RecordingNavigator::default(),
            None,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SessionCommand::parse("", 1).unwrap(), None);
        assert_eq!(SessionCommand::parse("  # note", 1).unwrap(), None);
        assert_eq!(
            SessionCommand::parse("select hardware", 1).unwrap(),
            Some(SessionCommand::Select("hardware".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("select", 1).unwrap(),
            Some(SessionCommand::Select(String::new()))
        );
        assert_eq!(
            SessionCommand::parse("input fixed_costs KES 5,000", 1).unwrap(),
            Some(SessionCommand::Input {
                field: "fixed_costs".to_string(),
                text: "KES 5,000".to_string()
            })
        );
        assert_eq!(
            SessionCommand::parse("EDIT months", 1).unwrap(),
            Some(SessionCommand::Edit {
                field: "months".to_string(),
                text: String::new()
            })
        );
    }

    #[test]
    fn test_parse_errors_carry_line_number() {
        let err = SessionCommand::parse("launch", 7).unwrap_err();
        assert!(matches!(err, Error::SessionScript { line: 7, .. }));

        let err = SessionCommand::parse("focus", 3).unwrap_err();
        assert!(matches!(err, Error::SessionScript { line: 3, .. }));
    }

    #[test]
    fn test_run_script() {
        let script = "\
# tweak marketplace
select marketplace
focus price
input price 7
blur price
remove months
start
demo
";
        let mut c = controller();
        let mut out = Vec::new();
        let targets = Session::new(&mut c, &mut out).run(script.as_bytes()).unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].parameters().price, 7.0);
        assert_eq!(targets[0].parameters().months, 12.0);
        assert_eq!(targets[1].parameters().fixed_costs, 10000.0);
        assert_eq!(c.navigator().visited.len(), 2);
        assert_eq!(c.panel().unwrap().content(ParamField::Price), Some("KES 7"));
    }

    #[test]
    fn test_show_writes_preview() {
        let mut c = controller();
        let mut out = Vec::new();
        Session::new(&mut c, &mut out)
            .run("select consulting\nshow\n".as_bytes())
            .unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("Consulting:"));
        assert!(shown.contains("KES 3,000"));
    }

    #[test]
    fn test_hide_drops_preview() {
        let mut c = controller();
        let mut out = Vec::new();
        let targets = Session::new(&mut c, &mut out)
            .run("select hardware\nhide\nshow\nedit price 1\nstart\n".as_bytes())
            .unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("(no preview)"));
        assert_eq!(targets[0].parameters().price, 300.0);
    }

    #[test]
    fn test_bad_line_stops_run() {
        let mut c = controller();
        let err = Session::new(&mut c, Vec::new())
            .run("select saas\nfly away\nstart\n".as_bytes())
            .unwrap_err();

        assert!(matches!(err, Error::SessionScript { line: 2, .. }));
        assert!(c.navigator().visited.is_empty());
    }
}

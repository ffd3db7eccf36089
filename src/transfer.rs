//! Parameter transfer: harvest the preview, fill gaps from the registry,
//! and hand the simulator URL to the host.
//!
//! The simulator always receives all six parameters. Values come from the
//! preview panel where a control exists and from the persona's registry
//! defaults everywhere else.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use tracing::{debug, info};
use url::form_urlencoded;
use url::Url;

use crate::config::NavigationSettings;
use crate::error::{Error, Result};
use crate::persona::{ParamField, ParameterSet, PersonaKey, PresetRegistry};
use crate::preview::{HarvestedValues, PreviewPanel, ValueFormatter};

// ─────────────────────────────────────────────────────────────────
// Merge / Serialize
// ─────────────────────────────────────────────────────────────────

/// Combine panel values with registry defaults.
///
/// A value present in the panel always wins, including a zero read from
/// empty or malformed content. Defaults only fill fields the panel lacks.
pub fn merge(panel: &HarvestedValues, defaults: &ParameterSet) -> ParameterSet {
    let mut merged = *defaults;
    for (field, value) in panel {
        merged.set(*field, *value);
    }
    merged
}

/// Serialize as `fixed_costs=..&price=..&...` in declared field order.
pub fn to_query(params: &ParameterSet) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, value) in params.iter() {
        serializer.append_pair(field.name(), &ValueFormatter::plain(value));
    }
    serializer.finish()
}

/// Parse a simulator link (full URL, `?query` or bare query) back into a
/// parameter set. Every one of the six parameters must be present and
/// numeric; other keys are ignored.
pub fn from_query(input: &str) -> Result<ParameterSet> {
    let input = input.trim();
    let query = input.split_once('?').map(|(_, q)| q).unwrap_or(input);
    let query = query.split_once('#').map(|(q, _)| q).unwrap_or(query);

    let mut found = HarvestedValues::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Ok(field) = key.parse::<ParamField>() else {
            debug!(key = %key, "Ignoring unrecognized query key");
            continue;
        };
        let number = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::invalid_value(field.name(), &*value))?;
        found.insert(field, number);
    }

    if let Some(missing) = ParamField::all().iter().find(|f| !found.contains_key(*f)) {
        return Err(Error::missing_parameter(missing.name()));
    }

    Ok(merge(&found, &ParameterSet::default()))
}

// ─────────────────────────────────────────────────────────────────
// Navigation Target
// ─────────────────────────────────────────────────────────────────

/// Which trigger the user pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// Forward the current preview values.
    Start,
    /// Forward the unmodified SaaS defaults.
    Demo,
}

/// Where the host should navigate, with the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTarget {
    url: Url,
    parameters: ParameterSet,
}

impl NavigationTarget {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Path plus query, e.g. `/simulator?fixed_costs=10000&...`.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

// ─────────────────────────────────────────────────────────────────
// Parameter Transfer
// ─────────────────────────────────────────────────────────────────

/// Builds simulator navigation targets.
#[derive(Debug, Clone)]
pub struct ParameterTransfer {
    destination: Url,
}

impl ParameterTransfer {
    /// `base_url` must be absolute; `simulator_path` is joined onto it.
    pub fn new(base_url: &str, simulator_path: &str) -> Result<Self> {
        let destination = Url::parse(base_url)?.join(simulator_path)?;
        Ok(Self { destination })
    }

    pub fn from_settings(settings: &NavigationSettings) -> Result<Self> {
        Self::new(&settings.base_url, &settings.simulator_path)
    }

    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// The complete parameter set for `action`.
    ///
    /// `Start` merges the live panel (if one is rendered) over the
    /// persona's defaults; `Demo` ignores the panel entirely.
    pub fn collect(
        &self,
        action: SubmitAction,
        panel: Option<&PreviewPanel>,
        persona: PersonaKey,
        registry: &PresetRegistry,
    ) -> ParameterSet {
        match action {
            SubmitAction::Start => {
                let harvested = panel.map(PreviewPanel::harvest).unwrap_or_default();
                if harvested.len() < ParamField::all().len() {
                    debug!(
                        present = harvested.len(),
                        persona = %persona.slug(),
                        "Filling missing fields from registry defaults"
                    );
                }
                merge(&harvested, &registry.defaults(persona))
            }
            SubmitAction::Demo => registry.defaults(PersonaKey::Saas),
        }
    }

    /// Attach `parameters` to the simulator URL.
    pub fn target(&self, parameters: ParameterSet) -> NavigationTarget {
        let mut url = self.destination.clone();
        url.set_query(Some(&to_query(&parameters)));
        NavigationTarget { url, parameters }
    }
}

// ─────────────────────────────────────────────────────────────────
// Navigator
// ─────────────────────────────────────────────────────────────────

/// The host side of navigation. A browser would change location; the CLI
/// prints the target.
pub trait Navigator {
    fn navigate(&mut self, target: &NavigationTarget) -> Result<()>;
}

/// How a [`WriterNavigator`] reports the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Absolute URL.
    #[default]
    Url,
    /// Path and query only.
    Path,
    /// The parameter set as JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "url" => Ok(OutputFormat::Url),
            "path" => Ok(OutputFormat::Path),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}'. Valid: url, path, json", s)),
        }
    }
}

/// Writes each navigation target to an output stream.
pub struct WriterNavigator<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> WriterNavigator<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }
}

impl<W: Write> Navigator for WriterNavigator<W> {
    fn navigate(&mut self, target: &NavigationTarget) -> Result<()> {
        let line = match self.format {
            OutputFormat::Url => target.as_str().to_string(),
            OutputFormat::Path => target.path_and_query(),
            OutputFormat::Json => serde_json::to_string_pretty(target.parameters())?,
        };

        writeln!(self.out, "{}", line).map_err(|e| Error::NavigationFailed {
            target: target.as_str().to_string(),
            message: e.to_string(),
        })?;

        info!(url = %target, "Navigating to simulator");
        Ok(())
    }
}

/// Keeps every target it is handed. Used by tests to observe navigation.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub visited: Vec<NavigationTarget>,
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn navigate(&mut self, target: &NavigationTarget) -> Result<()> {
        self.visited.push(target.clone());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAAS_QUERY: &str =
        "fixed_costs=10000&price=20&variable_cost=5&initial_sales=100&monthly_growth=0.06&months=24";

    fn transfer() -> ParameterTransfer {
        ParameterTransfer::new("http://localhost:5000", "/simulator").unwrap()
    }

    fn saas_panel() -> PreviewPanel {
        PreviewPanel::render(
            PersonaKey::Saas,
            &PresetRegistry::new(),
            &ValueFormatter::default(),
        )
    }

    #[test]
    fn test_merge_panel_wins() {
        let defaults = PresetRegistry::new().defaults(PersonaKey::Saas);
        let mut panel = HarvestedValues::new();
        panel.insert(ParamField::Price, 0.0);
        panel.insert(ParamField::Months, 36.0);

        let merged = merge(&panel, &defaults);
        assert_eq!(merged.price, 0.0);
        assert_eq!(merged.months, 36.0);
        assert_eq!(merged.fixed_costs, 10000.0);
    }

    #[test]
    fn test_to_query_saas() {
        let defaults = PresetRegistry::new().defaults(PersonaKey::Saas);
        assert_eq!(to_query(&defaults), SAAS_QUERY);
    }

    #[test]
    fn test_from_query_accepts_urls_and_bare_queries() {
        let expected = PresetRegistry::new().defaults(PersonaKey::Saas);
        assert_eq!(from_query(SAAS_QUERY).unwrap(), expected);
        assert_eq!(
            from_query(&format!("http://localhost:5000/simulator?{}#top", SAAS_QUERY)).unwrap(),
            expected
        );
        assert_eq!(
            from_query(&format!("?{}&utm_source=mail", SAAS_QUERY)).unwrap(),
            expected
        );
    }

    #[test]
    fn test_from_query_rejects_incomplete_or_invalid() {
        let err = from_query("fixed_costs=1&price=2").unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref field } if field == "variable_cost"));

        let err = from_query(&SAAS_QUERY.replace("price=20", "price=abc")).unwrap_err();
        assert!(matches!(err, Error::InvalidParameterValue { .. }));
    }

    #[test]
    fn test_start_with_edits() {
        let mut panel = saas_panel();
        panel.focus(ParamField::Price);
        panel.input(ParamField::Price, "35");
        panel.blur(ParamField::Price);

        let t = transfer();
        let params = t.collect(
            SubmitAction::Start,
            Some(&panel),
            PersonaKey::Saas,
            &PresetRegistry::new(),
        );
        assert_eq!(params.price, 35.0);

        let target = t.target(params);
        assert_eq!(
            target.path_and_query(),
            format!("/simulator?{}", SAAS_QUERY.replace("price=20", "price=35"))
        );
    }

    #[test]
    fn test_unedited_start_with_configured_currency_sends_defaults() {
        let registry = PresetRegistry::new();
        let rupees = ValueFormatter::new("Rs.", "en-IN");
        let mut panel = PreviewPanel::render(PersonaKey::Saas, &registry, &rupees);
        for &field in ParamField::all() {
            panel.focus(field);
            panel.blur(field);
        }

        let t = transfer();
        let params = t.collect(SubmitAction::Start, Some(&panel), PersonaKey::Saas, &registry);
        assert_eq!(params, registry.defaults(PersonaKey::Saas));
        assert_eq!(t.target(params).path_and_query(), format!("/simulator?{}", SAAS_QUERY));
    }

    #[test]
    fn test_start_fills_missing_fields_from_registry() {
        let registry = PresetRegistry::new();
        let mut panel = PreviewPanel::render(
            PersonaKey::Hardware,
            &registry,
            &ValueFormatter::default(),
        );
        panel.input(ParamField::Months, "6");
        panel.remove(ParamField::Months);

        let params = transfer().collect(
            SubmitAction::Start,
            Some(&panel),
            PersonaKey::Hardware,
            &registry,
        );
        assert_eq!(params.months, registry.get("hardware").months);
    }

    #[test]
    fn test_start_without_panel_uses_defaults() {
        let registry = PresetRegistry::new();
        let params = transfer().collect(
            SubmitAction::Start,
            None,
            PersonaKey::Consulting,
            &registry,
        );
        assert_eq!(params, registry.defaults(PersonaKey::Consulting));
    }

    #[test]
    fn test_demo_ignores_edits() {
        let mut panel = saas_panel();
        panel.input(ParamField::FixedCosts, "1");
        panel.input(ParamField::MonthlyGrowth, "0.5");

        let t = transfer();
        let params = t.collect(
            SubmitAction::Demo,
            Some(&panel),
            PersonaKey::Marketplace,
            &PresetRegistry::new(),
        );
        assert_eq!(
            t.target(params).as_str(),
            format!("http://localhost:5000/simulator?{}", SAAS_QUERY)
        );
    }

    #[test]
    fn test_malformed_input_still_sends_six_fields() {
        let mut panel = saas_panel();
        panel.input(ParamField::VariableCost, "abc");

        let t = transfer();
        let params = t.collect(
            SubmitAction::Start,
            Some(&panel),
            PersonaKey::Saas,
            &PresetRegistry::new(),
        );
        let target = t.target(params);
        assert_eq!(Url::parse(target.as_str()).unwrap().query_pairs().count(), 6);
        assert!(target.as_str().contains("variable_cost=0&"));
    }

    #[test]
    fn test_destination_join() {
        let t = ParameterTransfer::new("https://sim.example.com/app/", "/simulator").unwrap();
        assert_eq!(t.destination().as_str(), "https://sim.example.com/simulator");
        assert!(ParameterTransfer::new("localhost", "/simulator").is_err());
    }

    #[test]
    fn test_writer_navigator_formats() {
        let t = transfer();
        let target = t.target(PresetRegistry::new().defaults(PersonaKey::Saas));

        let mut out = Vec::new();
        WriterNavigator::new(&mut out, OutputFormat::Path)
            .navigate(&target)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("/simulator?{}\n", SAAS_QUERY)
        );

        let mut out = Vec::new();
        WriterNavigator::new(&mut out, OutputFormat::Json)
            .navigate(&target)
            .unwrap();
        let parsed: ParameterSet = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, *target.parameters());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("URL".parse::<OutputFormat>().unwrap(), OutputFormat::Url);
        assert_eq!("path".parse::<OutputFormat>().unwrap(), OutputFormat::Path);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}

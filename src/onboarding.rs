//! First-use walkthrough
//!
//! The walkthrough is shown until the user asks not to see it again. That
//! choice is persisted as a marker file in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Marker file name inside the data directory.
const MARKER_FILE: &str = "seen_walkthrough";

/// Text printed by `onboarding show`.
pub const WALKTHROUGH: &str = "\
╔══════════════════════════════════════════════════════════╗
║              Startup Simulator - Quick Tour              ║
╚══════════════════════════════════════════════════════════╝

  1. Pick a persona that looks like your business model.
  2. Review the defaults in the preview. Edit any value you
     know better, e.g. `start --set price=25`.
  3. Start the simulator with your values, or run the demo
     to see the SaaS example.

  Run `persona-launcher onboarding dismiss --dont-show-again`
  to stop seeing this tour.
";

/// Persistent "walkthrough seen" flag.
#[derive(Debug, Clone)]
pub struct OnboardingStore {
    marker_path: PathBuf,
}

impl OnboardingStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            marker_path: data_dir.join(MARKER_FILE),
        }
    }

    /// Whether the user opted out of the walkthrough.
    pub fn is_seen(&self) -> bool {
        self.marker_path.exists()
    }

    /// Persist the opt-out with the time it was made.
    pub fn mark_seen(&self) -> Result<()> {
        if let Some(parent) = self.marker_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(&self.marker_path, chrono::Utc::now().to_rfc3339()).map_err(|e| {
            Error::IoWrite {
                path: self.marker_path.clone(),
                source: e,
            }
        })?;

        info!(path = %self.marker_path.display(), "Walkthrough marked as seen");
        Ok(())
    }

    /// Forget the opt-out so the walkthrough shows again.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.marker_path) {
            Ok(()) => {
                info!(path = %self.marker_path.display(), "Walkthrough marker removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Walkthrough marker already absent");
                Ok(())
            }
            Err(e) => Err(Error::IoWrite {
                path: self.marker_path.clone(),
                source: e,
            }),
        }
    }

    /// When the opt-out was recorded, if it was.
    pub fn seen_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let content = fs::read_to_string(&self.marker_path).ok()?;
        chrono::DateTime::parse_from_rfc3339(content.trim())
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }
}

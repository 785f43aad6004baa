//! Output formats and their static metadata.
//!
//! A voice memo can be structured four ways; each way maps to one backend
//! endpoint, one response schema, and one set of copy strings for the host
//! UI. Keeping all of that in a single `&'static` table means switching
//! formats is a lookup, not a code path, and the table is the one place to
//! touch when the backend grows a new format.

use crate::error::VoxifyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The structuring mode requested for a voice memo.
///
/// The enum is closed: every variant has a mapped endpoint, so an
/// "unknown format" can only arise at the string boundary ([`FromStr`]),
/// never after selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Prioritised task board with next steps and notes. The free tier.
    Tasks,
    /// Strategic roadmap: market analysis, resources, dependencies,
    /// milestones, success metrics.
    Roadmap,
    /// Step-by-step process documentation.
    Process,
    /// Insight graph: central theme with orbiting insights, timeline,
    /// support elements, and detected patterns.
    Constellation,
}

impl OutputFormat {
    /// All formats, in presentation order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Tasks,
        OutputFormat::Roadmap,
        OutputFormat::Process,
        OutputFormat::Constellation,
    ];

    /// Lower-case wire/CLI name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tasks => "tasks",
            OutputFormat::Roadmap => "roadmap",
            OutputFormat::Process => "process",
            OutputFormat::Constellation => "constellation",
        }
    }

    /// Static metadata for this format.
    pub fn metadata(&self) -> &'static FormatMetadata {
        match self {
            OutputFormat::Tasks => &TASKS_META,
            OutputFormat::Roadmap => &ROADMAP_META,
            OutputFormat::Process => &PROCESS_META,
            OutputFormat::Constellation => &CONSTELLATION_META,
        }
    }

    /// Endpoint path for the upload, relative to the backend base URL.
    pub fn endpoint(&self) -> &'static str {
        self.metadata().endpoint
    }

    /// Whether this format requires a premium plan.
    pub fn is_premium(&self) -> bool {
        self.metadata().premium
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = VoxifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tasks" => Ok(OutputFormat::Tasks),
            "roadmap" => Ok(OutputFormat::Roadmap),
            "process" => Ok(OutputFormat::Process),
            "constellation" => Ok(OutputFormat::Constellation),
            other => Err(VoxifyError::InvalidConfig(format!(
                "unknown output format '{other}' (expected tasks, roadmap, process, or constellation)"
            ))),
        }
    }
}

/// Per-format static metadata: endpoint, UI copy, gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMetadata {
    /// Upload endpoint path, relative to the backend base URL.
    pub endpoint: &'static str,
    /// Headline shown above the upload affordance.
    pub headline: &'static str,
    /// Supporting copy under the headline.
    pub subtext: &'static str,
    /// Label on the process button.
    pub button_label: &'static str,
    /// Premium formats require entitlement before selection or upload.
    pub premium: bool,
}

static TASKS_META: FormatMetadata = FormatMetadata {
    endpoint: "/process-audio",
    headline: "Start Your Productivity Revolution",
    subtext: "Drop your voice memo or click to upload (MP3, M4A, WAV supported)",
    button_label: "Extract Tasks",
    premium: false,
};

static ROADMAP_META: FormatMetadata = FormatMetadata {
    endpoint: "/process-audio/roadmap",
    headline: "Create Your Strategic Roadmap",
    subtext: "Upload a voice memo describing your project vision and goals",
    button_label: "Generate Roadmap",
    premium: true,
};

static PROCESS_META: FormatMetadata = FormatMetadata {
    endpoint: "/process-audio/process",
    headline: "Document Your Expert Knowledge",
    subtext: "Record your process explanation and let AI structure it perfectly",
    button_label: "Create Documentation",
    premium: true,
};

static CONSTELLATION_META: FormatMetadata = FormatMetadata {
    endpoint: "/process-audio/constellation",
    headline: "Map Your Conversation Constellation",
    subtext: "Upload a discussion and see its themes, orbits, and timelines",
    button_label: "Map Constellation",
    premium: true,
};

/// Tracks which output format is active and gates premium selections.
///
/// At most one format is selected at a time. A denied premium selection
/// leaves the previous selection untouched, so the host can keep rendering
/// the old copy while it shows the upgrade prompt.
#[derive(Debug, Clone)]
pub struct FormatSelector {
    current: OutputFormat,
    premium: bool,
}

impl FormatSelector {
    /// New selector with `tasks` active, matching the initial page state.
    pub fn new(premium: bool) -> Self {
        Self {
            current: OutputFormat::Tasks,
            premium,
        }
    }

    /// The currently active format.
    pub fn current(&self) -> OutputFormat {
        self.current
    }

    /// Whether the caller holds the premium entitlement.
    pub fn is_premium_user(&self) -> bool {
        self.premium
    }

    /// Switch the active format and return its metadata.
    ///
    /// Premium formats fail with [`VoxifyError::PremiumRequired`] for
    /// non-premium callers; the current selection is left unchanged.
    pub fn select(&mut self, format: OutputFormat) -> Result<&'static FormatMetadata, VoxifyError> {
        if format.is_premium() && !self.premium {
            return Err(VoxifyError::PremiumRequired { format });
        }
        self.current = format;
        Ok(format.metadata())
    }
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_backend_routes() {
        assert_eq!(OutputFormat::Tasks.endpoint(), "/process-audio");
        assert_eq!(OutputFormat::Roadmap.endpoint(), "/process-audio/roadmap");
        assert_eq!(OutputFormat::Process.endpoint(), "/process-audio/process");
        assert_eq!(
            OutputFormat::Constellation.endpoint(),
            "/process-audio/constellation"
        );
    }

    #[test]
    fn only_tasks_is_free() {
        for format in OutputFormat::ALL {
            assert_eq!(
                format.is_premium(),
                format != OutputFormat::Tasks,
                "{format}"
            );
        }
    }

    #[test]
    fn from_str_round_trips() {
        for format in OutputFormat::ALL {
            assert_eq!(format.as_str().parse::<OutputFormat>().unwrap(), format);
        }
        assert!("karaoke".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn premium_selection_denied_keeps_previous() {
        let mut selector = FormatSelector::new(false);
        let err = selector.select(OutputFormat::Roadmap).unwrap_err();
        assert!(matches!(
            err,
            VoxifyError::PremiumRequired {
                format: OutputFormat::Roadmap
            }
        ));
        assert_eq!(selector.current(), OutputFormat::Tasks);
    }

    #[test]
    fn selection_round_trip_restores_metadata() {
        let mut selector = FormatSelector::new(true);
        let initial = selector.select(OutputFormat::Tasks).unwrap();

        selector.select(OutputFormat::Roadmap).unwrap();
        let restored = selector.select(OutputFormat::Tasks).unwrap();

        assert_eq!(initial, restored);
        assert_eq!(restored.endpoint, "/process-audio");
        assert_eq!(restored.headline, "Start Your Productivity Revolution");
    }
}

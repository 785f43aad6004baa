//! Wire-level data model: every JSON shape the backend can answer with.
//!
//! One struct per format, mirroring the backend's response models. Decoding
//! is deliberately forgiving in one specific way: any field that should be a
//! *sequence* but arrives as something else (null, a string, an object) is
//! treated as empty rather than failing the whole result; the AI upstream
//! occasionally emits such shapes and a memo's remaining content is still
//! worth showing. A *missing required top-level key* is different: that means
//! the response is not this format's payload at all, and decoding fails with
//! [`VoxifyError::MalformedResult`].

use crate::error::VoxifyError;
use crate::format::OutputFormat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a list field leniently: a JSON array decodes normally, any
/// other value (including null) decodes to an empty vec.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

// ── Tasks ────────────────────────────────────────────────────────────────

/// Response body of `POST /process-audio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Required: without tasks there is no board to render.
    #[serde(deserialize_with = "lenient_list")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub next_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub notes: Vec<String>,
}

/// A single extracted task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    /// Free-form on the wire; the board only files `High`/`Medium`/`Low`.
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `"Completed"` counts toward the progress ratio.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
}

impl Task {
    /// Whether this task counts as done for the progress ratio.
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("Completed")
    }
}

// ── Roadmap ──────────────────────────────────────────────────────────────

/// Response body of `POST /process-audio/roadmap`.
///
/// Five parallel timelines, each a chronological sequence of entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapPayload {
    #[serde(deserialize_with = "lenient_list")]
    pub market_analysis: Vec<RoadmapEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub resource_requirements: Vec<RoadmapEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub dependencies: Vec<RoadmapEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub milestones: Vec<RoadmapEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub success_metrics: Vec<RoadmapEntry>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One timeline entry in a roadmap section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapEntry {
    pub title: String,
    #[serde(default)]
    pub timeline: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub content: Vec<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

// ── Process documentation ────────────────────────────────────────────────

/// Response body of `POST /process-audio/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPayload {
    #[serde(default)]
    pub title: Option<String>,
    /// Required: the overview prose anchors the document.
    pub overview: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub prerequisites: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub steps: Vec<ProcessStep>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub notes: Vec<String>,
}

/// One sequential step. Numbering is assigned at render time; a
/// backend-supplied `number` is carried through but not trusted for order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStep {
    #[serde(default)]
    pub number: Option<u32>,
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub outcome: Option<String>,
}

// ── Constellation ────────────────────────────────────────────────────────

/// Response body of `POST /process-audio/constellation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstellationPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Required: the graph radiates from the central star.
    pub central_star: CentralStar,
    #[serde(default, deserialize_with = "lenient_list")]
    pub orbits: Vec<Orbit>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub timeline: Vec<TimelineMarker>,
    #[serde(default)]
    pub support: Support,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sentiment_patterns: Vec<SentimentPattern>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub decision_flows: Vec<DecisionFlow>,
}

/// The main theme of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralStar {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
}

/// A sub-insight radiating from the central theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orbit {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub points: Vec<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// A dated point on the constellation timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineMarker {
    #[serde(default)]
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Open questions and follow-up actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Support {
    #[serde(default, deserialize_with = "lenient_list")]
    pub questions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub actions: Vec<String>,
}

/// A detected sentiment cluster with its indicative phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPattern {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub markers: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
}

/// How a decision evolved through the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionFlow {
    pub initial: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub progression: Vec<String>,
    #[serde(default, rename = "final")]
    pub outcome: Option<String>,
}

// ── Health ───────────────────────────────────────────────────────────────

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub demo_mode: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ── ProcessedResult ──────────────────────────────────────────────────────

/// A decoded backend response, tagged by the format that produced it.
///
/// Immutable once decoded; consumed by [`crate::pipeline::render`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProcessedResult {
    Tasks(TaskPayload),
    Roadmap(RoadmapPayload),
    Process(ProcessPayload),
    Constellation(ConstellationPayload),
}

impl ProcessedResult {
    /// Decode a raw JSON value as the payload for `format`.
    ///
    /// Shape failures (missing required top-level key, wrong nesting) map to
    /// [`VoxifyError::MalformedResult`].
    pub fn from_json(
        format: OutputFormat,
        value: serde_json::Value,
    ) -> Result<Self, VoxifyError> {
        let malformed = |e: serde_json::Error| VoxifyError::MalformedResult {
            format,
            detail: e.to_string(),
        };
        match format {
            OutputFormat::Tasks => serde_json::from_value(value)
                .map(ProcessedResult::Tasks)
                .map_err(malformed),
            OutputFormat::Roadmap => serde_json::from_value(value)
                .map(ProcessedResult::Roadmap)
                .map_err(malformed),
            OutputFormat::Process => serde_json::from_value(value)
                .map(ProcessedResult::Process)
                .map_err(malformed),
            OutputFormat::Constellation => serde_json::from_value(value)
                .map(ProcessedResult::Constellation)
                .map_err(malformed),
        }
    }

    /// The format this result was decoded as.
    pub fn format(&self) -> OutputFormat {
        match self {
            ProcessedResult::Tasks(_) => OutputFormat::Tasks,
            ProcessedResult::Roadmap(_) => OutputFormat::Roadmap,
            ProcessedResult::Process(_) => OutputFormat::Process,
            ProcessedResult::Constellation(_) => OutputFormat::Constellation,
        }
    }
}

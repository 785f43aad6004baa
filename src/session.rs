//! Session orchestration: format selection, the step indicator, backend
//! health, and the validate → upload → render drive.
//!
//! A [`SessionController`] is the explicit object a host application
//! constructs and owns; there is no ambient global. All session state
//! (current format, current step, last known backend status) lives here;
//! presentation stays with the host, which reads the typed state and the
//! rendered sections.
//!
//! ## Health monitoring
//!
//! The backend advertises a degraded "demo" mode where responses are mocked
//! rather than AI-generated. The session probes `/health` on a fixed
//! interval; a probe that fails outright (offline, refused) is treated as an
//! implicit demo-mode signal rather than an error, so the host's indicator
//! degrades gracefully instead of flapping between error states.

use crate::config::ClientConfig;
use crate::error::VoxifyError;
use crate::format::{FormatMetadata, FormatSelector, OutputFormat};
use crate::payload::HealthReport;
use crate::pipeline::validate::{self, AudioSource};
use crate::process::{run_pipeline, ProcessedDocument};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the user is in the linear flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    /// Picking an output format.
    ChooseFormat = 1,
    /// Format chosen; waiting for a file.
    AwaitingFile = 2,
    /// A file was accepted and is processing (or has processed).
    Processing = 3,
}

impl Step {
    /// 1-based indicator position, as shown in the host's step strip.
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Last observed backend state. Not persisted; a fresh session starts
/// pessimistic (unavailable, not demo) until the first probe lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStatus {
    pub available: bool,
    pub demo_mode: bool,
}

/// Probe `/health` once and fold the answer into a [`BackendStatus`].
///
/// Any failure along the way (transport, non-JSON body) yields
/// `{available: false, demo_mode: true}`: offline implies demo.
pub async fn probe_health(
    http: &reqwest::Client,
    config: &ClientConfig,
) -> BackendStatus {
    let url = format!("{}/health", config.base_url);
    let report: Result<HealthReport, _> = async {
        http.get(&url)
            .timeout(Duration::from_secs(config.health_timeout_secs))
            .send()
            .await?
            .json::<HealthReport>()
            .await
    }
    .await;

    match report {
        Ok(report) => {
            let status = BackendStatus {
                available: report.status == "ok",
                demo_mode: report.demo_mode,
            };
            debug!("health: status='{}' demo_mode={}", report.status, report.demo_mode);
            status
        }
        Err(e) => {
            warn!("health check failed: {e}");
            BackendStatus {
                available: false,
                demo_mode: true,
            }
        }
    }
}

/// Top-level orchestrator for one user session.
pub struct SessionController {
    config: ClientConfig,
    http: reqwest::Client,
    selector: FormatSelector,
    step: Step,
    backend: Arc<Mutex<BackendStatus>>,
}

impl SessionController {
    pub fn new(config: ClientConfig) -> Result<Self, VoxifyError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| VoxifyError::Internal(format!("http client: {e}")))?;
        let premium = config.premium;
        Ok(Self {
            config,
            http,
            selector: FormatSelector::new(premium),
            step: Step::ChooseFormat,
            backend: Arc::new(Mutex::new(BackendStatus::default())),
        })
    }

    /// The currently selected output format (defaults to `tasks`).
    pub fn current_format(&self) -> OutputFormat {
        self.selector.current()
    }

    /// Current position in the linear flow.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Last observed backend status.
    pub fn backend_status(&self) -> BackendStatus {
        *self.backend.lock().expect("backend status lock")
    }

    /// Select an output format and advance to the awaiting-file step.
    ///
    /// A denied premium selection leaves both the selection and the step
    /// unchanged, so the host keeps its current copy while showing the
    /// upgrade prompt.
    pub fn select_format(
        &mut self,
        format: OutputFormat,
    ) -> Result<&'static FormatMetadata, VoxifyError> {
        let metadata = self.selector.select(format)?;
        if self.step < Step::AwaitingFile {
            self.step = Step::AwaitingFile;
        }
        Ok(metadata)
    }

    /// Probe backend health once and record the result.
    pub async fn check_health(&self) -> BackendStatus {
        let status = probe_health(&self.http, &self.config).await;
        *self.backend.lock().expect("backend status lock") = status;
        status
    }

    /// Spawn a background task that re-probes health on the configured
    /// interval, updating the shared status. Abort the handle to stop.
    pub fn spawn_health_monitor(&self) -> JoinHandle<()> {
        let http = self.http.clone();
        let config = self.config.clone();
        let shared = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(config.health_interval_secs));
            loop {
                ticker.tick().await;
                let status = probe_health(&http, &config).await;
                let mut current = shared.lock().expect("backend status lock");
                if *current != status {
                    info!(
                        "backend status changed: available={} demo_mode={}",
                        status.available, status.demo_mode
                    );
                }
                *current = status;
            }
        })
    }

    /// Accept a file and drive it through validate → upload → render.
    ///
    /// The format is captured here, at submission: switching formats while
    /// the upload is in flight does not retarget or cancel it. Validation
    /// failures return before the step changes; once a file is accepted the
    /// session moves to [`Step::Processing`] and stays there even if the
    /// upload later fails, so the host can offer a manual retry in place.
    pub async fn submit(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<ProcessedDocument, VoxifyError> {
        let format = self.selector.current();
        let source = validate::resolve_audio(path)?;
        validate::validate(&source, format, &self.config)?;

        self.step = Step::Processing;
        self.submit_source(source, format).await
    }

    async fn submit_source(
        &self,
        source: AudioSource,
        format: OutputFormat,
    ) -> Result<ProcessedDocument, VoxifyError> {
        run_pipeline(&self.http, &source, format, &self.config).await
    }

    /// Status-banner text for a completed upload, demo-mode aware.
    pub fn completion_message(&self) -> &'static str {
        if self.backend_status().demo_mode {
            "Processed in demo mode - using mock data"
        } else {
            "Processing complete!"
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("format", &self.selector.current())
            .field("step", &self.step)
            .field("backend", &self.backend_status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_one_indexed_and_ordered() {
        assert_eq!(Step::ChooseFormat.index(), 1);
        assert_eq!(Step::AwaitingFile.index(), 2);
        assert_eq!(Step::Processing.index(), 3);
        assert!(Step::ChooseFormat < Step::Processing);
    }

    #[test]
    fn new_session_starts_at_choose_format_with_tasks() {
        let session = SessionController::new(ClientConfig::default()).unwrap();
        assert_eq!(session.step(), Step::ChooseFormat);
        assert_eq!(session.current_format(), OutputFormat::Tasks);
        assert_eq!(session.backend_status(), BackendStatus::default());
    }

    #[test]
    fn selecting_a_format_advances_the_step() {
        let mut session = SessionController::new(ClientConfig::default()).unwrap();
        session.select_format(OutputFormat::Tasks).unwrap();
        assert_eq!(session.step(), Step::AwaitingFile);
    }

    #[test]
    fn denied_premium_selection_changes_nothing() {
        let mut session = SessionController::new(ClientConfig::default()).unwrap();
        let err = session.select_format(OutputFormat::Constellation).unwrap_err();
        assert!(matches!(err, VoxifyError::PremiumRequired { .. }));
        assert_eq!(session.current_format(), OutputFormat::Tasks);
        assert_eq!(session.step(), Step::ChooseFormat);
    }

    #[test]
    fn completion_message_tracks_demo_mode() {
        let session = SessionController::new(ClientConfig::default()).unwrap();
        assert_eq!(session.completion_message(), "Processing complete!");
        *session.backend.lock().unwrap() = BackendStatus {
            available: false,
            demo_mode: true,
        };
        assert_eq!(
            session.completion_message(),
            "Processed in demo mode - using mock data"
        );
    }
}

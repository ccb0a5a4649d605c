//! Scenario replay
//!
//! A scenario describes one settings session: the loaded snapshot, probe
//! results and a list of user and probe events. Replaying it through a
//! [`SettingsSession`] yields a report of every step plus the final state.
//!
//! ```yaml
//! initial:
//!   platform: windows
//!   settings:
//!     - { name: FUNCTIONS_EXTENSION_VERSION, value: "~2" }
//! probes:
//!   function_count: { result: { state: complete, value: 3 } }
//!   host_status: { result: { state: failed } }
//! events:
//!   - { event: request, target: "~3" }
//! ```

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use fnc_settings::ConfigurationSnapshot;
use fnc_version::{HostStatus, MajorVersion, ProbeResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::RuntimeSettingsConfig;
use crate::controller::{ControllerState, TransitionOutcome};
use crate::driver::{resolve_function_count, resolve_host_status, FunctionCountSource, HostStatusSource};
use crate::error::{ProbeError, ScenarioError};
use crate::form::Permissions;
use crate::session::SettingsSession;
use crate::view::{Advisory, ConfirmationDialog, ControlView};

/// One session to replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Snapshot the form is loaded with
    pub initial: ConfigurationSnapshot,
    /// Edits already made before the first event
    #[serde(default)]
    pub working: Option<ConfigurationSnapshot>,
    /// User permissions
    #[serde(default)]
    pub permissions: Permissions,
    /// Probe answers resolved through the driver before the events run; a probe
    /// left out stays loading until an event settles it
    #[serde(default)]
    pub probes: ScriptedProbes,
    /// Events in order
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    /// Parse a JSON scenario
    ///
    /// # Errors
    /// Returns error if the JSON does not describe a scenario
    pub fn from_json_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a YAML scenario
    ///
    /// # Errors
    /// Returns error if the YAML does not describe a scenario
    pub fn from_yaml_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a scenario file; `.yaml` / `.yml` are read as YAML, anything else as JSON
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }
}

/// Probe results answered by scripted sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedProbes {
    /// Function-count answer
    #[serde(default)]
    pub function_count: Option<ScriptedProbe<u32>>,
    /// Host-status answer
    #[serde(default)]
    pub host_status: Option<ScriptedProbe<HostStatus>>,
}

/// A probe answer with an optional delay
///
/// A `loading` result never answers, so the driver times it out as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedProbe<T> {
    /// Answer to give
    pub result: ProbeResult<T>,
    /// Delay before answering
    #[serde(default)]
    pub delay_ms: u64,
}

#[async_trait]
impl FunctionCountSource for ScriptedProbe<u32> {
    async fn function_count(&self) -> Result<u32, ProbeError> {
        self.answer().await
    }
}

#[async_trait]
impl HostStatusSource for ScriptedProbe<HostStatus> {
    async fn host_status(&self) -> Result<HostStatus, ProbeError> {
        self.answer().await
    }
}

impl<T: Clone + Send + Sync> ScriptedProbe<T> {
    async fn answer(&self) -> Result<T, ProbeError> {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        match &self.result {
            ProbeResult::Complete(value) => Ok(value.clone()),
            ProbeResult::Failed => Err(ProbeError::Unavailable("scripted failure".into())),
            ProbeResult::Loading => std::future::pending().await,
        }
    }
}

/// Something that happens during the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// User picks a version
    Request {
        /// Picked version
        target: MajorVersion,
    },
    /// User confirms the dialog
    Confirm,
    /// User dismisses the dialog
    Dismiss,
    /// Function-count lookup settles
    FunctionCount {
        /// Lookup result
        result: ProbeResult<u32>,
    },
    /// Host-status lookup settles
    HostStatus {
        /// Lookup result
        result: ProbeResult<HostStatus>,
    },
    /// User edits another setting; `value: null` removes it
    Edit {
        /// Setting name
        name: String,
        /// New value
        #[serde(default)]
        value: Option<String>,
    },
    /// A different record is loaded
    Reload {
        /// New baseline
        initial: ConfigurationSnapshot,
    },
    /// Permissions change
    Permissions {
        /// New permissions
        permissions: Permissions,
    },
}

/// What a step did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The change was applied
    Applied {
        /// Applied version
        target: MajorVersion,
        /// Advisory raised
        advisory: Option<Advisory>,
    },
    /// Confirmation dialog opened
    ConfirmationRequired {
        /// Dialog contents
        dialog: ConfirmationDialog,
    },
    /// Pending change confirmed and applied
    Confirmed {
        /// Applied version
        target: MajorVersion,
    },
    /// Pending change discarded
    Dismissed {
        /// Discarded version
        target: MajorVersion,
    },
    /// The controller refused the event
    Rejected {
        /// Refusal message
        error: String,
    },
    /// A probe result was offered to the session
    ProbeObserved {
        /// Whether the session recorded it
        accepted: bool,
    },
    /// The working snapshot was edited
    Edited,
    /// A new record was loaded
    Reloaded,
    /// Permissions were replaced
    PermissionsChanged,
}

/// One replayed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Event as given
    pub event: ScenarioEvent,
    /// What it did
    pub outcome: StepOutcome,
}

/// Result of a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Steps in order
    pub steps: Vec<StepRecord>,
    /// Final controller state
    pub state: ControllerState,
    /// Final working snapshot
    pub settings: ConfigurationSnapshot,
    /// Final render model
    pub view: ControlView,
}

/// Replay `scenario` through a fresh session
pub async fn run_scenario(scenario: &Scenario, config: &RuntimeSettingsConfig) -> ScenarioReport {
    let mut session = SettingsSession::new(config.clone(), scenario.initial.clone())
        .with_permissions(scenario.permissions);
    if let Some(working) = &scenario.working {
        session.edit_working(working.clone());
    }

    let session = Mutex::new(session);
    resolve_scripted(&session, &scenario.probes, config.probes.timeout()).await;
    let mut session = session.into_inner();

    let mut steps = Vec::with_capacity(scenario.events.len());
    for event in &scenario.events {
        let outcome = replay(&mut session, event);
        tracing::debug!(?event, ?outcome, "scenario step");
        steps.push(StepRecord {
            event: event.clone(),
            outcome,
        });
    }

    ScenarioReport {
        steps,
        state: session.state(),
        settings: session.working().clone(),
        view: session.view(),
    }
}

async fn resolve_scripted(session: &Mutex<SettingsSession>, probes: &ScriptedProbes, timeout: Duration) {
    let id = session.lock().id();
    let counts = async {
        if let Some(source) = &probes.function_count {
            resolve_function_count(session, id, source, timeout).await;
        }
    };
    let hosts = async {
        if let Some(source) = &probes.host_status {
            resolve_host_status(session, id, source, timeout).await;
        }
    };
    tokio::join!(counts, hosts);
}

fn replay(session: &mut SettingsSession, event: &ScenarioEvent) -> StepOutcome {
    match event {
        ScenarioEvent::Request { target } => match session.request_change(*target) {
            Ok(TransitionOutcome::Applied(change)) => StepOutcome::Applied {
                target: change.target,
                advisory: change.advisory,
            },
            Ok(TransitionOutcome::ConfirmationRequired(dialog)) => {
                StepOutcome::ConfirmationRequired { dialog }
            }
            Err(error) => rejected(&error),
        },
        ScenarioEvent::Confirm => match session.confirm() {
            Ok(target) => StepOutcome::Confirmed { target },
            Err(error) => rejected(&error),
        },
        ScenarioEvent::Dismiss => match session.dismiss() {
            Ok(target) => StepOutcome::Dismissed { target },
            Err(error) => rejected(&error),
        },
        ScenarioEvent::FunctionCount { result } => {
            let id = session.id();
            StepOutcome::ProbeObserved {
                accepted: session.observe_function_count(id, result.clone()),
            }
        }
        ScenarioEvent::HostStatus { result } => {
            let id = session.id();
            StepOutcome::ProbeObserved {
                accepted: session.observe_host_status(id, result.clone()),
            }
        }
        ScenarioEvent::Edit { name, value } => {
            let working = session.working().clone();
            let working = match value {
                Some(value) => working.upsert(name.as_str(), value.as_str()),
                None => working.remove(name),
            };
            session.edit_working(working);
            StepOutcome::Edited
        }
        ScenarioEvent::Reload { initial } => {
            session.load(initial.clone());
            StepOutcome::Reloaded
        }
        ScenarioEvent::Permissions { permissions } => {
            session.set_permissions(*permissions);
            StepOutcome::PermissionsChanged
        }
    }
}

fn rejected(error: &crate::error::TransitionError) -> StepOutcome {
    StepOutcome::Rejected {
        error: error.to_string(),
    }
}

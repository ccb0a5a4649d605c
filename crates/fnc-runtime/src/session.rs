//! In-memory settings form session
//!
//! Plays the part of the host form store: it owns both snapshots, the probe
//! results and the permissions, feeds them to the controller and writes
//! replacement snapshots back whole.

use fnc_settings::ConfigurationSnapshot;
use fnc_version::{HostStatus, MajorVersion, ProbeResult};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::config::RuntimeSettingsConfig;
use crate::controller::{ControllerState, TransitionController, TransitionOutcome};
use crate::error::TransitionError;
use crate::form::{FormContext, Permissions};
use crate::view::ControlView;

/// Identity of one load of the settings form
///
/// Probe results carry the id they were started for; results for an older
/// load are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings form state for one app
#[derive(Debug, Clone)]
pub struct SettingsSession {
    id: SessionId,
    initial: ConfigurationSnapshot,
    working: ConfigurationSnapshot,
    function_count: ProbeResult<u32>,
    host_status: ProbeResult<HostStatus>,
    permissions: Permissions,
    controller: TransitionController,
}

impl SettingsSession {
    /// Start a session on `initial` with both probes loading
    #[must_use]
    pub fn new(config: RuntimeSettingsConfig, initial: ConfigurationSnapshot) -> Self {
        let mut controller = TransitionController::new(config);
        controller.sync_baseline(&initial);
        Self {
            id: SessionId::new(),
            working: initial.clone(),
            initial,
            function_count: ProbeResult::Loading,
            host_status: ProbeResult::Loading,
            permissions: Permissions::default(),
            controller,
        }
    }

    /// With permissions
    #[inline]
    #[must_use]
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Load a new record, discarding edits, probe results and any pending change
    pub fn load(&mut self, initial: ConfigurationSnapshot) -> SessionId {
        self.id = SessionId::new();
        self.working = initial.clone();
        self.initial = initial;
        self.function_count = ProbeResult::Loading;
        self.host_status = ProbeResult::Loading;
        self.controller.reset();
        self.controller.sync_baseline(&self.initial);
        tracing::info!(session = %self.id, "settings session loaded");
        self.id
    }

    /// Current session id
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Baseline snapshot
    #[inline]
    #[must_use]
    pub fn initial(&self) -> &ConfigurationSnapshot {
        &self.initial
    }

    /// Working snapshot
    #[inline]
    #[must_use]
    pub fn working(&self) -> &ConfigurationSnapshot {
        &self.working
    }

    /// Latest function-count result
    #[inline]
    #[must_use]
    pub fn function_count(&self) -> &ProbeResult<u32> {
        &self.function_count
    }

    /// Latest host-status result
    #[inline]
    #[must_use]
    pub fn host_status(&self) -> &ProbeResult<HostStatus> {
        &self.host_status
    }

    /// Current permissions
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Replace permissions, e.g. while a save is in flight
    #[inline]
    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    /// Controller state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Replace the working snapshot with an edit made elsewhere in the form
    pub fn edit_working(&mut self, working: ConfigurationSnapshot) {
        self.working = working;
    }

    /// Record the function-count result for session `id`
    ///
    /// Returns `false` when the result was ignored: it belongs to an older
    /// session, the probe already settled, or the result is not terminal.
    pub fn observe_function_count(&mut self, id: SessionId, result: ProbeResult<u32>) -> bool {
        let current_id = self.id;
        accept_probe(&mut self.function_count, current_id, id, result, "function_count")
    }

    /// Record the host-status result for session `id`
    ///
    /// Same acceptance rules as [`Self::observe_function_count`].
    pub fn observe_host_status(&mut self, id: SessionId, result: ProbeResult<HostStatus>) -> bool {
        let current_id = self.id;
        accept_probe(&mut self.host_status, current_id, id, result, "host_status")
    }

    /// Handle a dropdown selection, writing the result back when applied
    ///
    /// # Errors
    /// See [`TransitionController::request_change`].
    pub fn request_change(&mut self, target: MajorVersion) -> Result<TransitionOutcome, TransitionError> {
        let ctx = FormContext {
            initial: &self.initial,
            working: &self.working,
            function_count: &self.function_count,
            host_status: &self.host_status,
            permissions: self.permissions,
        };
        let outcome = self.controller.request_change(&ctx, target)?;
        if let TransitionOutcome::Applied(change) = &outcome {
            self.working = change.settings.clone();
        }
        Ok(outcome)
    }

    /// Confirm the pending change and write it back
    ///
    /// # Errors
    /// [`TransitionError::NothingPending`] when no confirmation is open.
    pub fn confirm(&mut self) -> Result<MajorVersion, TransitionError> {
        let ctx = FormContext {
            initial: &self.initial,
            working: &self.working,
            function_count: &self.function_count,
            host_status: &self.host_status,
            permissions: self.permissions,
        };
        let change = self.controller.confirm(&ctx)?;
        self.working = change.settings;
        Ok(change.target)
    }

    /// Dismiss the pending change
    ///
    /// # Errors
    /// [`TransitionError::NothingPending`] when no confirmation is open.
    pub fn dismiss(&mut self) -> Result<MajorVersion, TransitionError> {
        self.controller.dismiss(&self.initial)
    }

    /// Render model of the control
    #[must_use]
    pub fn view(&self) -> ControlView {
        self.controller.view(&self.context())
    }

    fn context(&self) -> FormContext<'_> {
        FormContext {
            initial: &self.initial,
            working: &self.working,
            function_count: &self.function_count,
            host_status: &self.host_status,
            permissions: self.permissions,
        }
    }
}

fn accept_probe<T: std::fmt::Debug>(
    slot: &mut ProbeResult<T>,
    current: SessionId,
    issued_for: SessionId,
    result: ProbeResult<T>,
    probe: &'static str,
) -> bool {
    if issued_for != current {
        tracing::warn!(probe, %issued_for, %current, "ignoring probe result from a previous session");
        return false;
    }
    if slot.is_settled() {
        tracing::warn!(probe, "ignoring repeated probe result");
        return false;
    }
    if result.is_loading() {
        return false;
    }
    tracing::debug!(probe, ?result, "probe settled");
    *slot = result;
    true
}

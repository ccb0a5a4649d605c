//! Runtime-version transition controller
//!
//! States and transitions:
//!
//! ```text
//! Idle --request_change(safe)--------> Idle                 (applied)
//! Idle --request_change(unsafe)------> AwaitingConfirmation (nothing applied)
//! AwaitingConfirmation --confirm()---> Idle                 (applied)
//! AwaitingConfirmation --dismiss()---> Idle                 (discarded)
//! any --baseline extension version changes--> Idle
//! ```
//!
//! A request is unsafe when functions exist and the compatibility matrix
//! rejects moving from the running version to the target. Gating is
//! re-derived from the latest probe results on every call.

use fnc_settings::{AppSettingKey, ConfigurationSnapshot};
use fnc_version::{is_transition_safe, resolve_version_in_use, MajorVersion, ProbeResult};
use serde::{Deserialize, Serialize};

use crate::config::RuntimeSettingsConfig;
use crate::error::TransitionError;
use crate::form::{has_existing_functions, FormContext, FormFacts};
use crate::mutator::SettingsMutator;
use crate::options::{build_options, find_option, visible_options};
use crate::view::{
    Advisory, ConfirmationDialog, ControlView, DisabledReason, ExistingFunctionsWarning,
    InfoBubble, Placeholder,
};

/// Controller state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum ControllerState {
    /// No confirmation in flight
    #[default]
    Idle,
    /// Waiting for the user to confirm `target`
    AwaitingConfirmation(MajorVersion),
}

/// A change that has been written to a replacement snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    /// Version the user picked
    pub target: MajorVersion,
    /// Full replacement for the working snapshot
    pub settings: ConfigurationSnapshot,
    /// Notice to surface next to the control
    pub advisory: Option<Advisory>,
}

/// Result of a change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The change was safe and has been applied
    Applied(AppliedChange),
    /// The change needs confirmation; nothing was applied
    ConfirmationRequired(ConfirmationDialog),
}

/// Session-scoped state machine behind the runtime-version dropdown
#[derive(Debug, Clone, Default)]
pub struct TransitionController {
    config: RuntimeSettingsConfig,
    state: ControllerState,
    advisory: Option<Advisory>,
    /// Extension version of the baseline this state belongs to (`""` when unset)
    baseline: Option<String>,
}

impl TransitionController {
    /// Create an idle controller
    #[inline]
    #[must_use]
    pub fn new(config: RuntimeSettingsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Target awaiting confirmation
    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<MajorVersion> {
        match self.state {
            ControllerState::AwaitingConfirmation(target) => Some(target),
            ControllerState::Idle => None,
        }
    }

    /// Advisory raised by the last applied change
    #[inline]
    #[must_use]
    pub fn advisory(&self) -> Option<Advisory> {
        self.advisory
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeSettingsConfig {
        &self.config
    }

    /// Drop any pending confirmation and advisory
    pub fn reset(&mut self) {
        if let Some(target) = self.pending() {
            tracing::info!(%target, "discarding pending runtime version change on reset");
        }
        self.state = ControllerState::Idle;
        self.advisory = None;
    }

    /// Reset when `initial` carries a different baseline than the one seen last
    pub fn sync_baseline(&mut self, initial: &ConfigurationSnapshot) {
        let current = baseline_key(initial);
        if self.baseline.as_deref() != Some(current) {
            if self.baseline.is_some() {
                tracing::debug!(baseline = current, "baseline extension version changed");
                self.reset();
            }
            self.baseline = Some(current.to_string());
        }
    }

    /// Handle a dropdown selection
    ///
    /// # Errors
    /// Refuses while a confirmation is open or the control is disabled, and
    /// for versions that are not offered or not selectable. Hidden options
    /// still count as offered.
    pub fn request_change(
        &mut self,
        ctx: &FormContext<'_>,
        target: MajorVersion,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.sync_baseline(ctx.initial);

        if let Some(pending) = self.pending() {
            tracing::warn!(%target, %pending, "change requested while a confirmation is open");
            return Err(TransitionError::ConfirmationPending(pending));
        }

        let facts = self.facts(ctx);
        if let Some(reason) = disabled_reason(ctx, &facts) {
            tracing::warn!(%target, %reason, "change requested while control is disabled");
            return Err(TransitionError::ControlDisabled(reason));
        }

        let options = build_options(&facts);
        match find_option(&options, target) {
            None => {
                tracing::warn!(%target, "change requested for a version that is not offered");
                return Err(TransitionError::OptionUnavailable(target));
            }
            Some(option) if !option.enabled => {
                tracing::warn!(%target, "change requested for a disabled option");
                return Err(TransitionError::OptionDisabled(target));
            }
            Some(_) => {}
        }

        self.advisory = None;

        let version_in_use = resolve_version_in_use(ctx.host_status, facts.initial_extension_version);
        if has_existing_functions(ctx.function_count) && !is_transition_safe(version_in_use, target) {
            self.state = ControllerState::AwaitingConfirmation(target);
            tracing::info!(%target, ?version_in_use, "runtime version change needs confirmation");
            return Ok(TransitionOutcome::ConfirmationRequired(ConfirmationDialog {
                version_in_use,
                target,
            }));
        }

        if target == MajorVersion::V3 && facts.initial_major == MajorVersion::V2 {
            self.advisory = Some(Advisory::MovingFromV2);
        }

        Ok(TransitionOutcome::Applied(self.apply(ctx, target)))
    }

    /// Apply the pending target
    ///
    /// # Errors
    /// [`TransitionError::NothingPending`] when no confirmation is open.
    pub fn confirm(&mut self, ctx: &FormContext<'_>) -> Result<AppliedChange, TransitionError> {
        self.sync_baseline(ctx.initial);

        let target = self.pending().ok_or(TransitionError::NothingPending)?;
        let change = self.apply(ctx, target);
        self.state = ControllerState::Idle;
        Ok(change)
    }

    /// Discard the pending target
    ///
    /// # Errors
    /// [`TransitionError::NothingPending`] when no confirmation is open,
    /// including one dropped because `initial` carries a new baseline.
    pub fn dismiss(&mut self, initial: &ConfigurationSnapshot) -> Result<MajorVersion, TransitionError> {
        self.sync_baseline(initial);

        let target = self.pending().ok_or(TransitionError::NothingPending)?;
        self.state = ControllerState::Idle;
        tracing::info!(%target, "runtime version change dismissed");
        Ok(target)
    }

    /// Render model for the current inputs
    ///
    /// State recorded against an older baseline is treated as already reset.
    #[must_use]
    pub fn view(&self, ctx: &FormContext<'_>) -> ControlView {
        if !ctx.permissions.can_edit() {
            return ControlView::read_only();
        }

        let (state, advisory) = if self.baseline.as_deref() == Some(baseline_key(ctx.initial)) {
            (self.state, self.advisory)
        } else {
            (ControllerState::Idle, None)
        };

        let facts = self.facts(ctx);
        let disabled_reason = disabled_reason(ctx, &facts);
        let version_in_use = resolve_version_in_use(ctx.host_status, facts.initial_extension_version);

        let placeholder = match ctx.function_count {
            ProbeResult::Loading if !facts.has_custom_version() => Some(Placeholder::Loading),
            ProbeResult::Failed => Some(Placeholder::LoadingFailed),
            _ => None,
        };

        let info_bubble = (facts.has_custom_version() && !facts.is_live_v4())
            .then_some(InfoBubble::CustomVersion);

        let existing_functions_warning = (has_existing_functions(ctx.function_count)
            && !is_transition_safe(version_in_use, facts.current_major))
        .then_some(ExistingFunctionsWarning {
            version_in_use,
            selected: facts.current_major,
        });

        let confirmation = match state {
            ControllerState::AwaitingConfirmation(target) => Some(ConfirmationDialog {
                version_in_use,
                target,
            }),
            ControllerState::Idle => None,
        };

        ControlView {
            read_only: false,
            options: visible_options(&build_options(&facts)),
            selected: Some(facts.current_major),
            disabled: disabled_reason.is_some(),
            disabled_reason,
            dirty: facts.current_major != facts.initial_major,
            placeholder,
            info_bubble,
            version_in_use,
            existing_functions_warning,
            advisory,
            confirmation,
        }
    }

    fn facts<'a>(&self, ctx: &FormContext<'a>) -> FormFacts<'a> {
        FormFacts::derive(ctx.initial, ctx.working, &self.config.worker_runtime.dotnet)
    }

    fn apply(&self, ctx: &FormContext<'_>, target: MajorVersion) -> AppliedChange {
        let settings = SettingsMutator::new(&self.config).apply(ctx.working, ctx.initial, target);
        tracing::info!(%target, advisory = ?self.advisory, "runtime version change applied");
        AppliedChange {
            target,
            settings,
            advisory: self.advisory,
        }
    }
}

/// First reason the dropdown is disabled, if any
#[must_use]
pub fn disabled_reason(ctx: &FormContext<'_>, facts: &FormFacts<'_>) -> Option<DisabledReason> {
    if !ctx.permissions.can_edit() {
        return Some(DisabledReason::ReadOnly);
    }
    if ctx.permissions.saving {
        return Some(DisabledReason::Saving);
    }
    match ctx.function_count {
        ProbeResult::Loading => return Some(DisabledReason::FunctionCountLoading),
        ProbeResult::Failed => return Some(DisabledReason::FunctionCountFailed),
        ProbeResult::Complete(_) => {}
    }
    if facts.has_custom_version() && !facts.eligible_for_v4 {
        return Some(DisabledReason::CustomVersionLocked);
    }
    None
}

fn baseline_key(initial: &ConfigurationSnapshot) -> &str {
    initial
        .setting(AppSettingKey::FunctionsExtensionVersion)
        .unwrap_or_default()
}

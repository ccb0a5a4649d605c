//! Functions runtime-version control
//!
//! The controller behind the runtime-version dropdown of an app-settings form:
//! - Builds the option set for the current snapshots and platform
//! - Gates unsafe transitions behind a confirmation when functions exist
//! - Rewrites the dependent settings when a change is applied
//! - Derives the full render model (placeholder, banners, dialog) on demand
//!
//! # Example
//!
//! ```
//! use fnc_runtime::prelude::*;
//! use fnc_settings::{AppSettingKey, ConfigurationSnapshot, SitePlatform};
//! use fnc_version::{HostStatus, MajorVersion, ProbeResult};
//!
//! let initial = ConfigurationSnapshot::new(SitePlatform::Windows)
//!     .with_setting(AppSettingKey::FunctionsExtensionVersion, "~3");
//!
//! let mut session = SettingsSession::new(RuntimeSettingsConfig::default(), initial);
//! let id = session.id();
//! session.observe_function_count(id, ProbeResult::Complete(0));
//! session.observe_host_status(id, ProbeResult::Complete(HostStatus::running("3.0.1.0")));
//!
//! let outcome = session.request_change(MajorVersion::V1).unwrap();
//! assert!(matches!(outcome, TransitionOutcome::Applied(_)));
//! assert_eq!(
//!     session.working().setting(AppSettingKey::FunctionsExtensionVersion),
//!     Some("~1")
//! );
//! ```

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod form;
pub mod mutator;
pub mod options;
pub mod scenario;
pub mod session;
pub mod view;

// Re-exports for convenience
pub use config::{ConfigError, NodeVersionDefaults, ProbeConfig, RuntimeSettingsConfig, WorkerRuntimeConfig};
pub use controller::{disabled_reason, AppliedChange, ControllerState, TransitionController, TransitionOutcome};
pub use driver::{
    resolve_function_count, resolve_host_status, resolve_probes, FunctionCountSource,
    HostStatusSource, ProbeSummary,
};
pub use error::{ProbeError, ScenarioError, TransitionError};
pub use form::{has_existing_functions, is_eligible_for_v4, FormContext, FormFacts, Permissions};
pub use mutator::{apply_version, SettingsMutator};
pub use options::{build_options, find_option, visible_options, VersionOption, CUSTOM_LABEL};
pub use scenario::{
    run_scenario, Scenario, ScenarioEvent, ScenarioReport, ScriptedProbe, ScriptedProbes,
    StepOutcome, StepRecord,
};
pub use session::{SessionId, SettingsSession};
pub use view::{
    Advisory, ConfirmationDialog, ControlView, DisabledReason, ExistingFunctionsWarning,
    InfoBubble, Placeholder,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the runtime-version control
    pub use crate::{
        ControlView, ControllerState, FormContext, Permissions, RuntimeSettingsConfig,
        SettingsSession, TransitionController, TransitionError, TransitionOutcome,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

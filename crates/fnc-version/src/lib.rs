//! Functions runtime versions
//!
//! Pure building blocks the runtime-version control consults:
//! - [`MajorVersion`] and the parsers for persisted, exact and configured forms
//! - [`is_transition_safe`]: the compatibility matrix gating confirmation
//! - [`ProbeResult`] and [`resolve_version_in_use`]: which version is really running
//!
//! # Example
//!
//! ```
//! use fnc_version::{is_transition_safe, resolve_version_in_use, HostStatus, MajorVersion, ProbeResult};
//!
//! let host = ProbeResult::Complete(HostStatus::running("3.0.15417.0"));
//! let in_use = resolve_version_in_use(&host, Some("~3"));
//!
//! assert_eq!(in_use, Some(MajorVersion::V3));
//! assert!(is_transition_safe(in_use, MajorVersion::V2));
//! assert!(!is_transition_safe(in_use, MajorVersion::V1));
//! ```

pub mod compat;
pub mod error;
pub mod probe;
pub mod version;

pub use compat::{allowed_targets, is_transition_safe};
pub use error::VersionParseError;
pub use probe::{resolve_version_in_use, HostState, HostStatus, ProbeResult};
pub use version::{parse_configured_runtime_version, parse_exact_runtime_version, MajorVersion};

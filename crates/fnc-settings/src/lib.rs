//! Application-settings snapshots
//!
//! Provides the form-side data model the runtime-version control works on:
//! - [`AppSettingKey`]: the closed vocabulary of settings the control touches
//! - [`ConfigurationSnapshot`]: ordered, unique-name settings plus site platform
//! - [`SettingsStore`]: the get / upsert / remove contract of the form store
//!
//! # Example
//!
//! ```
//! use fnc_settings::{AppSettingKey, ConfigurationSnapshot, SitePlatform};
//!
//! let snapshot = ConfigurationSnapshot::new(SitePlatform::Windows)
//!     .with_setting(AppSettingKey::FunctionsExtensionVersion, "~3")
//!     .with_setting(AppSettingKey::FunctionsWorkerRuntime, "node");
//!
//! assert_eq!(snapshot.setting(AppSettingKey::FunctionsExtensionVersion), Some("~3"));
//! ```

pub mod error;
pub mod key;
pub mod snapshot;
pub mod store;

pub use error::SettingsError;
pub use key::{AppSettingKey, UnknownSettingKey};
pub use snapshot::{AppSettingEntry, ConfigurationSnapshot, SitePlatform};
pub use store::SettingsStore;

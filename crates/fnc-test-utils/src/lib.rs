//! Testing utilities for the fnc workspace
//!
//! Shared snapshot fixtures, ready-made sessions and probe sources.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fnc_runtime::{
    FunctionCountSource, HostStatusSource, ProbeError, RuntimeSettingsConfig, SettingsSession,
};
use fnc_settings::{AppSettingKey, ConfigurationSnapshot, SitePlatform};
use fnc_version::{HostState, HostStatus, ProbeResult};

pub fn snapshot(platform: SitePlatform, settings: &[(AppSettingKey, &str)]) -> ConfigurationSnapshot {
    settings
        .iter()
        .fold(ConfigurationSnapshot::new(platform), |acc, (key, value)| {
            acc.with_setting(*key, *value)
        })
}

/// Windows app on `extension_version` with a node worker
pub fn windows_app(extension_version: &str) -> ConfigurationSnapshot {
    app(SitePlatform::Windows, extension_version, "node")
}

/// Linux app on `extension_version` with a node worker
pub fn linux_app(extension_version: &str) -> ConfigurationSnapshot {
    app(SitePlatform::Linux, extension_version, "node")
}

pub fn app(platform: SitePlatform, extension_version: &str, worker_runtime: &str) -> ConfigurationSnapshot {
    snapshot(
        platform,
        &[
            (AppSettingKey::FunctionsExtensionVersion, extension_version),
            (AppSettingKey::FunctionsWorkerRuntime, worker_runtime),
        ],
    )
}

pub fn running_host(version: &str) -> ProbeResult<HostStatus> {
    ProbeResult::Complete(HostStatus::running(version))
}

pub fn errored_host(version: &str) -> ProbeResult<HostStatus> {
    ProbeResult::Complete(HostStatus::new(HostState::Error, version))
}

/// Session on `initial` with both probes already settled
pub fn ready_session(
    initial: ConfigurationSnapshot,
    function_count: ProbeResult<u32>,
    host_status: ProbeResult<HostStatus>,
) -> SettingsSession {
    let mut session = SettingsSession::new(RuntimeSettingsConfig::default(), initial);
    let id = session.id();
    session.observe_function_count(id, function_count);
    session.observe_host_status(id, host_status);
    session
}

/// Probe source answering a fixed result after an optional delay
#[derive(Debug)]
pub struct FixedSource<T> {
    result: Result<T, ProbeError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl<T> FixedSource<T> {
    pub fn ok(value: T) -> Self {
        Self::new(Ok(value))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(ProbeError::Unavailable(message.to_string())))
    }

    fn new(result: Result<T, ProbeError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: Clone> FixedSource<T> {
    async fn answer(&self) -> Result<T, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

#[async_trait]
impl FunctionCountSource for FixedSource<u32> {
    async fn function_count(&self) -> Result<u32, ProbeError> {
        self.answer().await
    }
}

#[async_trait]
impl HostStatusSource for FixedSource<HostStatus> {
    async fn host_status(&self) -> Result<HostStatus, ProbeError> {
        self.answer().await
    }
}

/// Probe source that never answers
#[derive(Debug, Default)]
pub struct HangingSource;

#[async_trait]
impl FunctionCountSource for HangingSource {
    async fn function_count(&self) -> Result<u32, ProbeError> {
        std::future::pending().await
    }
}

#[async_trait]
impl HostStatusSource for HangingSource {
    async fn host_status(&self) -> Result<HostStatus, ProbeError> {
        std::future::pending().await
    }
}

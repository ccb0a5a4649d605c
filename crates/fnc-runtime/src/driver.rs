//! Asynchronous probe driver
//!
//! Runs the function-count and host-status lookups concurrently and feeds
//! each result into the session as soon as it lands. Errors and timeouts
//! become `Failed`; the control never waits on a lookup forever.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fnc_version::{HostStatus, ProbeResult};
use parking_lot::Mutex;

use crate::error::ProbeError;
use crate::session::{SessionId, SettingsSession};

/// Source of the number of functions deployed to the app
#[async_trait]
pub trait FunctionCountSource: Send + Sync {
    /// Count the app's functions
    async fn function_count(&self) -> Result<u32, ProbeError>;
}

/// Source of the running host's status
#[async_trait]
pub trait HostStatusSource: Send + Sync {
    /// Fetch the host status
    async fn host_status(&self) -> Result<HostStatus, ProbeError>;
}

/// Which probe results the session accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Function count was recorded
    pub function_count_accepted: bool,
    /// Host status was recorded
    pub host_status_accepted: bool,
}

/// Resolve both probes for the session's current load
///
/// The session id is captured up front, so if the session is reloaded while
/// a lookup is in flight its late result is dropped.
pub async fn resolve_probes<C, H>(
    session: &Mutex<SettingsSession>,
    counts: &C,
    hosts: &H,
    timeout: Duration,
) -> ProbeSummary
where
    C: FunctionCountSource + ?Sized,
    H: HostStatusSource + ?Sized,
{
    let id = session.lock().id();

    let (function_count_accepted, host_status_accepted) = tokio::join!(
        resolve_function_count(session, id, counts, timeout),
        resolve_host_status(session, id, hosts, timeout),
    );
    ProbeSummary {
        function_count_accepted,
        host_status_accepted,
    }
}

/// Resolve only the function-count probe for session `id`
pub async fn resolve_function_count<C>(
    session: &Mutex<SettingsSession>,
    id: SessionId,
    counts: &C,
    timeout: Duration,
) -> bool
where
    C: FunctionCountSource + ?Sized,
{
    let result = fetch("function_count", counts.function_count(), timeout).await;
    session.lock().observe_function_count(id, result)
}

/// Resolve only the host-status probe for session `id`
pub async fn resolve_host_status<H>(
    session: &Mutex<SettingsSession>,
    id: SessionId,
    hosts: &H,
    timeout: Duration,
) -> bool
where
    H: HostStatusSource + ?Sized,
{
    let result = fetch("host_status", hosts.host_status(), timeout).await;
    session.lock().observe_host_status(id, result)
}

async fn fetch<T>(
    probe: &'static str,
    lookup: impl Future<Output = Result<T, ProbeError>>,
    timeout: Duration,
) -> ProbeResult<T> {
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(value)) => ProbeResult::Complete(value),
        Ok(Err(error)) => {
            tracing::warn!(probe, %error, "probe failed");
            ProbeResult::Failed
        }
        Err(_) => {
            let error = ProbeError::TimedOut(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
            tracing::warn!(probe, %error, "probe failed");
            ProbeResult::Failed
        }
    }
}

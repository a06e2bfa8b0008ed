//! Correlation id for one HTTP request.
//!
//! The `Trace` middleware generates an id per request and runs the handler
//! inside [`TraceId::scope`]. Audit and session errors built while the scope is
//! active pick the id up through [`TraceId::current`], so a failed submission
//! can be matched to its `trace-id` response header and log lines.
//!
//! The id lives in a tokio task-local and is not inherited by spawned tasks.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static REQUEST_TRACE: TraceId;
}

/// Random UUID naming a single request.
///
/// ```
/// use audit_backend::TraceId;
///
/// let id: TraceId = "6f1c1f5e-2f43-4a43-9bd1-4f1f3b0c6d2a".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1c1f5e-2f43-4a43-9bd1-4f1f3b0c6d2a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh id for an incoming request.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_TRACE.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current request id.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        REQUEST_TRACE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

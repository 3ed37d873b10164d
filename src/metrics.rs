//! Vendor-agnostic provisioning metrics via a pluggable sink.
//!
//! Implement [`MetricsSink`] and install it with [`set_sink`] to receive
//! a [`ProvisionStats`] after every provisioning call:
//!
//! ```rust
//! use provision_core::metrics::{MetricsSink, ProvisionStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct FailureCounter(AtomicU64);
//!
//! impl MetricsSink for FailureCounter {
//!     fn on_provision(&self, stats: &ProvisionStats) {
//!         if !stats.succeeded {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//!
//! provision_core::metrics::set_sink(Arc::new(FailureCounter(AtomicU64::new(0))));
//! ```
//!
//! Without a sink, events are dropped.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::warn;

use crate::types::ResourceKind;

/// Outcome of one provisioning call.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionStats {
    pub kind: ResourceKind,
    /// `vol1` or `vol1/bucket1`
    pub identity: String,
    /// Time spent connecting, creating and releasing the connection
    pub duration: Duration,
    pub succeeded: bool,
}

pub trait MetricsSink: Send + Sync {
    /// Called once per provisioning call, after the connection is released.
    fn on_provision(&self, stats: &ProvisionStats);
}

struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_provision(&self, _stats: &ProvisionStats) {}
}

static SINK: Lazy<RwLock<Arc<dyn MetricsSink>>> = Lazy::new(|| RwLock::new(Arc::new(NoOpSink)));

/// Install the global sink, replacing any previous one.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    match SINK.write() {
        Ok(mut slot) => *slot = sink,
        Err(e) => warn!("Metrics sink lock poisoned, keeping the previous sink: {e}"),
    }
}

fn sink() -> Arc<dyn MetricsSink> {
    match SINK.read() {
        Ok(slot) => Arc::clone(&slot),
        Err(_) => Arc::new(NoOpSink),
    }
}

pub(crate) fn record_provision(
    kind: ResourceKind,
    identity: String,
    duration: Duration,
    succeeded: bool,
) {
    sink().on_provision(&ProvisionStats {
        kind,
        identity,
        duration,
        succeeded,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialization() {
        let stats = ProvisionStats {
            kind: ResourceKind::Bucket,
            identity: "vol1/b1".to_string(),
            duration: Duration::from_millis(42),
            succeeded: true,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["kind"], "bucket");
        assert_eq!(json["identity"], "vol1/b1");
        assert_eq!(json["succeeded"], true);
    }

    #[test]
    fn test_record_with_default_sink() {
        record_provision(
            ResourceKind::Volume,
            "vol1".to_string(),
            Duration::from_micros(10),
            false,
        );
    }
}

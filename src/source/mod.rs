pub mod opener;
pub mod trace;

pub use opener::{FileOpener, LineSource, ResourceBundle, ResourceOpener, SourceId, TraceOpener};
pub use trace::TraceSource;

use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by data sources.
///
/// Only configuration and open failures ever reach the caller; read
/// errors, malformed records and close failures are absorbed inside
/// the playback loop.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source identifier is missing or unusable. Fatal at
    /// construction; the playback loop never starts.
    #[error("invalid source configuration: {0}")]
    Configuration(String),

    /// The identifier could not be resolved to a readable stream.
    /// Fatal to the whole playback lifecycle: the loop stops without
    /// retrying.
    #[error("couldn't open the trace source {uri}")]
    Open {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

/// A sink for payloads emitted by a data source.
///
/// `receive` is invoked synchronously on the source's own thread, one
/// payload at a time, in source order. Closures taking a `String`
/// implement this trait directly.
pub trait SourceCallback: Send + Sync {
    fn receive(&self, payload: String);
}

impl<F> SourceCallback for F
where
    F: Fn(String) + Send + Sync,
{
    fn receive(&self, payload: String) {
        self(payload)
    }
}

/// Trait for pluggable vehicle data sources.
///
/// Every source shares the same lifecycle: a consumer callback is
/// attached (and may be replaced later), payloads flow to it as they
/// become available, and the source is eventually stopped.
pub trait VehicleDataSource: Send {
    /// Attach or replace the consumer callback. Delivery cannot begin
    /// until the first callback is attached; re-attachment swaps the
    /// sink for future emissions only.
    fn set_callback(&self, callback: Arc<dyn SourceCallback>);

    /// Stop the source. Idempotent and safe to call from any thread.
    fn stop(&self);
}

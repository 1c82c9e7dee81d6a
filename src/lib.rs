//! Vehicle data trace playback.
//!
//! Replays a pre-recorded trace of timestamped records back to a
//! consumer at the same relative timing as the original recording,
//! looping from the top of the trace until stopped. The expected trace
//! format is one record per line, a UNIX timestamp and a payload
//! separated by the first colon:
//!
//! ```text
//! 1332794184.319404: {"name":"fuel_consumed_since_restart","value":0.090000}
//! 1332794184.502802: {"name":"steering_wheel_angle","value":-346.985229}
//! ```
//!
//! The engine is payload-format-agnostic; the JSON shape above is a
//! consumer convention (see [`core::VehicleMessage`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use vtrace::{TraceSource, VehicleDataSource};
//!
//! let source = TraceSource::new("/var/trace/driving.json")?;
//! source.set_callback(Arc::new(|payload: String| {
//!     println!("{payload}");
//! }));
//! // ... later
//! source.stop();
//! # Ok::<(), vtrace::SourceError>(())
//! ```

pub mod core;
pub mod playback;
pub mod source;

pub use crate::core::{Record, VehicleMessage};
pub use crate::playback::PlaybackOrigin;
pub use crate::source::{SourceCallback, SourceError, TraceSource, VehicleDataSource};

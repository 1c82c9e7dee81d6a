use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::Record;
use crate::playback::PlaybackOrigin;
use crate::source::opener::{opener_for, LineSource, ResourceBundle, SourceId, TraceOpener};
use crate::source::{SourceCallback, SourceError, VehicleDataSource};

/// Delay between playback passes, so an exhausted or broken trace does
/// not spin the loop
const RESTART_DELAY: Duration = Duration::from_secs(1);

/// A vehicle data source that replays a pre-recorded trace.
///
/// Each line of the trace pairs a UNIX timestamp with a payload,
/// separated by the first colon:
///
/// ```text
/// 1332794184.319404: {"name":"fuel_consumed_since_restart","value":0.090000}
/// ```
///
/// Records are re-emitted to the attached callback at the same relative
/// timing as the original recording, and playback loops from the top of
/// the trace once it runs out. The loop runs on a dedicated background
/// thread spawned at construction, but no lines are read until a
/// callback is attached. Malformed lines are skipped; a read error ends
/// the current pass only; an open failure ends playback for good.
pub struct TraceSource {
    name: String,
    shared: Arc<Shared>,
}

/// State shared between the playback thread and its controllers.
///
/// `running` transitions true to false exactly once. The callback slot
/// is last-writer-wins and doubles, with the condvar, as the gate and
/// the interruptible-sleep primitive.
struct Shared {
    running: AtomicBool,
    callback: Mutex<Option<Arc<dyn SourceCallback>>>,
    wakeup: Condvar,
}

impl Shared {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn current_callback(&self) -> Option<Arc<dyn SourceCallback>> {
        self.callback.lock().unwrap().clone()
    }

    fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        // Take the lock before notifying so a thread between its flag
        // check and its wait cannot miss the wakeup
        let _guard = self.callback.lock().unwrap();
        self.wakeup.notify_all();
    }

    /// Block until a callback has been attached or the source stopped
    fn wait_for_callback(&self) {
        let mut guard = self.callback.lock().unwrap();
        while self.is_running() && guard.is_none() {
            guard = self.wakeup.wait(guard).unwrap();
        }
    }

    /// Sleep that a concurrent stop cuts short. Returns false if the
    /// source was stopped before the full duration elapsed.
    fn interruptible_sleep(&self, duration: Duration) -> bool {
        let started = Instant::now();
        let mut guard = self.callback.lock().unwrap();
        while self.is_running() {
            let elapsed = started.elapsed();
            if elapsed >= duration {
                return true;
            }
            let (next, _) = self.wakeup.wait_timeout(guard, duration - elapsed).unwrap();
            guard = next;
        }
        false
    }
}

impl TraceSource {
    /// Construct a trace source for the given identifier and start its
    /// playback thread. Plain paths and `file://` URIs open regular
    /// files; `resource://` identifiers need [`TraceSource::with_bundle`].
    pub fn new(uri: &str) -> Result<Self, SourceError> {
        Self::build(uri, None)
    }

    /// Construct a trace source whose `resource://` identifiers resolve
    /// through the given bundle.
    pub fn with_bundle(
        uri: &str,
        bundle: Arc<dyn ResourceBundle>,
    ) -> Result<Self, SourceError> {
        Self::build(uri, Some(bundle))
    }

    /// Construct a trace source directly from an opener, bypassing
    /// identifier resolution.
    pub fn with_opener(name: impl Into<String>, opener: impl TraceOpener + 'static) -> Self {
        Self::spawn(name.into(), Box::new(opener))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn build(uri: &str, bundle: Option<Arc<dyn ResourceBundle>>) -> Result<Self, SourceError> {
        let id = SourceId::parse(uri)?;
        let opener = opener_for(&id, bundle.as_ref())?;
        Ok(Self::spawn(uri.to_string(), opener))
    }

    fn spawn(name: String, opener: Box<dyn TraceOpener>) -> Self {
        debug!("starting trace source for {}", name);
        let shared = Arc::new(Shared {
            running: AtomicBool::new(true),
            callback: Mutex::new(None),
            wakeup: Condvar::new(),
        });

        let loop_shared = shared.clone();
        let loop_name = name.clone();
        thread::spawn(move || playback_loop(&loop_name, opener.as_ref(), &loop_shared));

        Self { name, shared }
    }
}

impl VehicleDataSource for TraceSource {
    fn set_callback(&self, callback: Arc<dyn SourceCallback>) {
        let mut guard = self.shared.callback.lock().unwrap();
        *guard = Some(callback);
        self.shared.wakeup.notify_all();
    }

    fn stop(&self) {
        debug!("stopping playback of trace {}", self.name);
        self.shared.request_stop();
    }
}

impl Drop for TraceSource {
    fn drop(&mut self) {
        self.shared.request_stop();
    }
}

/// Drive open, read-and-pace, close, delay, reopen until stopped
fn playback_loop(name: &str, opener: &dyn TraceOpener, shared: &Shared) {
    shared.wait_for_callback();

    while shared.is_running() {
        let reader = match opener.open() {
            Ok(reader) => reader,
            Err(e) => {
                warn!("couldn't open the trace {}: {}", name, e);
                break;
            }
        };

        debug!("starting a playback pass of trace {}", name);
        if !stream_pass(name, reader, shared) {
            break;
        }

        // Pass ended at end-of-stream or a read error; pause before the
        // next attempt
        if !shared.interruptible_sleep(RESTART_DELAY) {
            break;
        }
        debug!("restarting playback of trace {}", name);
    }

    debug!("playback of trace {} is finished", name);
}

/// Read one pass of the trace, pacing each record against a fresh
/// origin. Returns false if playback was stopped mid-pass. Dropping the
/// reader closes it regardless of how the pass ended.
fn stream_pass(name: &str, reader: LineSource, shared: &Shared) -> bool {
    let mut origin = PlaybackOrigin::start();
    let mut lines = reader.lines();

    while shared.is_running() {
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!("read error in trace {}: {}", name, e);
                return true;
            }
            None => return true,
        };

        let record = match Record::parse_line(&line) {
            Some(record) => record,
            None => {
                warn!("trace line was not in the expected format: {}", line);
                continue;
            }
        };

        let wait = origin.wait_for(record.timestamp);
        if !wait.is_zero() && !shared.interruptible_sleep(wait) {
            return false;
        }

        // The gate was passed before the first open, so a callback is
        // always present; it is re-read per record because attachment
        // is last-writer-wins
        match shared.current_callback() {
            Some(callback) => callback.receive(record.payload),
            None => return false,
        }
    }
    false
}

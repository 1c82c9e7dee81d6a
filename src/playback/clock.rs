use std::time::{Duration, Instant};

/// Pacing anchor for one playback pass.
///
/// Pairs the trace timestamp of the pass's first record with the
/// wall-clock instant the pass began. Every later record's wait is
/// computed against this single origin, so pacing error does not
/// accumulate across records, and a fresh origin per pass means looped
/// replays always restart from time zero.
#[derive(Debug, Clone)]
pub struct PlaybackOrigin {
    first_timestamp: Option<f64>,
    started_at: Instant,
}

impl PlaybackOrigin {
    /// Begin a new pass anchored at the current instant
    pub fn start() -> Self {
        Self {
            first_timestamp: None,
            started_at: Instant::now(),
        }
    }

    /// Whether a first record has anchored this pass yet
    pub fn is_anchored(&self) -> bool {
        self.first_timestamp.is_some()
    }

    /// How long to wait before emitting a record with the given trace
    /// timestamp.
    ///
    /// The first record of a pass anchors the origin and waits zero;
    /// later records wait out whatever remains of their offset from the
    /// anchor. Never negative: late, non-monotonic or otherwise odd
    /// timestamps emit immediately rather than erroring.
    pub fn wait_for(&mut self, timestamp: f64) -> Duration {
        let first = *self.first_timestamp.get_or_insert(timestamp);
        let offset = timestamp - first;
        // The comparison is written to also send NaN down the zero path
        if !(offset > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(offset)
            .unwrap_or(Duration::MAX)
            .saturating_sub(self.started_at.elapsed())
    }
}

use time::{Duration, OffsetDateTime};

/// A UTC instant reported by the test runner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    /// Builds a timestamp from milliseconds since the Unix epoch.
    ///
    /// Returns `None` when the value is outside the representable range.
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        let nanos = i128::from(millis) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .map(Self)
    }

    /// Time elapsed from `self` until `later`, clamped at zero when `later` is earlier.
    pub fn elapsed_until(&self, later: Timestamp) -> Duration {
        let delta = later.0 - self.0;
        if delta.is_negative() {
            Duration::ZERO
        } else {
            delta
        }
    }
}

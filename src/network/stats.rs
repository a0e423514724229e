use serde::Serialize;

/// Running min / max / average over a stream of observations
#[derive(Debug, Clone, PartialEq)]
pub struct RunningStats {
    /// Number of observations recorded
    pub count: u64,
    /// Smallest observation, +inf while empty
    pub min: f64,
    /// Largest observation, -inf while empty
    pub max: f64,
    /// Incrementally recomputed mean, 0 while empty
    pub average: f64,
}

impl RunningStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            average: 0.0,
        }
    }

    /// Record one observation.
    ///
    /// The mean is recomputed as `(old * n + value) / (n + 1)` so that the
    /// result only depends on the order of observations.
    pub fn record(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let n = self.count as f64;
        self.average = (self.average * n + value) / (n + 1.0);
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Snapshot for reporting, None if nothing was recorded
    pub fn summary(&self) -> Option<StatSummary> {
        if self.is_empty() {
            return None;
        }
        Some(StatSummary {
            count: self.count,
            min: self.min,
            max: self.max,
            average: self.average,
        })
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen statistics as they appear in a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

use std::sync::Mutex;

use serde::Serialize;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Counters accumulated over a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub sections: usize,
    pub empty_extractions: usize,
    pub benches: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_section(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.sections += 1;
        }
    }

    /// Counts the benches of one extraction; zero benches counts as empty.
    pub fn record_extraction(&self, bench_count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.benches += bench_count;
            if bench_count == 0 {
                metrics.empty_extractions += 1;
            }
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_counts_benches_and_empties() {
        let recorder = MetricsRecorder::new();
        recorder.record_section();
        recorder.record_extraction(3);
        recorder.record_extraction(0);
        recorder.record_error();
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.sections, 1);
        assert_eq!(snapshot.benches, 3);
        assert_eq!(snapshot.empty_extractions, 1);
        assert_eq!(snapshot.errors, 1);
    }
}

//! In-memory serving statistics, summarised periodically to the log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept per window
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for the prediction endpoints
pub struct ServingMetrics {
    /// Single-transaction predictions served
    pub single_requests: AtomicU64,
    /// Batch uploads served
    pub batch_requests: AtomicU64,
    /// Rows classified across all requests
    pub rows_scored: AtomicU64,
    /// Rows classified as fraud
    pub fraud_flagged: AtomicU64,
    /// Requests answered with an error
    pub failed_requests: AtomicU64,
    /// Request handling times (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServingMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            single_requests: AtomicU64::new(0),
            batch_requests: AtomicU64::new(0),
            rows_scored: AtomicU64::new(0),
            fraud_flagged: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served single prediction
    pub fn record_single(&self, elapsed: Duration, fraud: bool) {
        self.single_requests.fetch_add(1, Ordering::Relaxed);
        self.record_rows(1, fraud as u64);
        self.record_latency(elapsed);
    }

    /// Record a served batch prediction
    pub fn record_batch(&self, elapsed: Duration, rows: usize, fraud: usize) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        self.record_rows(rows as u64, fraud as u64);
        self.record_latency(elapsed);
    }

    /// Record a request that ended in an error
    pub fn record_failure(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rows(&self, rows: u64, fraud: u64) {
        self.rows_scored.fetch_add(rows, Ordering::Relaxed);
        self.fraud_flagged.fetch_add(fraud, Ordering::Relaxed);
    }

    fn record_latency(&self, elapsed: Duration) {
        if let Ok(mut times) = self.latencies.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep only the most recent half once full
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Get latency statistics
    pub fn get_latency_stats(&self) -> LatencyStats {
        let times = match self.latencies.read() {
            Ok(times) => times,
            Err(_) => return LatencyStats::default(),
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let requests = self.single_requests.load(Ordering::Relaxed)
            + self.batch_requests.load(Ordering::Relaxed);
        if elapsed > 0.0 {
            requests as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Share of scored rows flagged as fraud, in percent
    pub fn fraud_rate(&self) -> f64 {
        let rows = self.rows_scored.load(Ordering::Relaxed);
        if rows == 0 {
            return 0.0;
        }
        self.fraud_flagged.load(Ordering::Relaxed) as f64 / rows as f64 * 100.0
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let latency = self.get_latency_stats();

        info!(
            single_requests = self.single_requests.load(Ordering::Relaxed),
            batch_requests = self.batch_requests.load(Ordering::Relaxed),
            failed_requests = self.failed_requests.load(Ordering::Relaxed),
            rows_scored = self.rows_scored.load(Ordering::Relaxed),
            fraud_rate = format!("{:.2}%", self.fraud_rate()),
            throughput = format!("{:.2} req/s", self.get_throughput()),
            mean_us = latency.mean_us,
            p50_us = latency.p50_us,
            p95_us = latency.p95_us,
            p99_us = latency.p99_us,
            max_us = latency.max_us,
            "Serving metrics"
        );
    }
}

impl Default for ServingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: Arc<ServingMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServingMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

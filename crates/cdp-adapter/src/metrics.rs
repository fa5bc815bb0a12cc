//! Per-kind snippet counters and round-trip latency

use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{histogram_opts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::error;

/// Collectors for every snippet the channel evaluates, labelled by snippet kind.
#[derive(Clone)]
pub struct ChannelMetrics {
    commands: IntCounterVec,
    failures: IntCounterVec,
    latency: HistogramVec,
}

impl ChannelMetrics {
    fn new() -> prometheus::Result<Self> {
        Ok(Self {
            commands: IntCounterVec::new(
                Opts::new("relay_channel_commands_total", "Snippets evaluated"),
                &["kind"],
            )?,
            failures: IntCounterVec::new(
                Opts::new(
                    "relay_channel_command_failures_total",
                    "Snippets that failed to evaluate or decode",
                ),
                &["kind"],
            )?,
            latency: HistogramVec::new(
                histogram_opts!(
                    "relay_channel_command_duration_seconds",
                    "Snippet round-trip latency",
                    vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0]
                ),
                &["kind"],
            )?,
        })
    }

    fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.commands.clone()))?;
        registry.register(Box::new(self.failures.clone()))?;
        registry.register(Box::new(self.latency.clone()))
    }

    fn observe(&self, kind: &str, elapsed: Duration, ok: bool) {
        self.commands.with_label_values(&[kind]).inc();
        if ok {
            self.latency
                .with_label_values(&[kind])
                .observe(elapsed.as_secs_f64());
        } else {
            self.failures.with_label_values(&[kind]).inc();
        }
    }
}

static CHANNEL_METRICS: Lazy<Option<ChannelMetrics>> = Lazy::new(|| {
    ChannelMetrics::new()
        .map_err(|err| error!(?err, "failed to create channel metrics"))
        .ok()
});

/// Adds the channel collectors to `registry`. Registering twice is a no-op.
pub fn register_metrics(registry: &Registry) {
    let Some(metrics) = CHANNEL_METRICS.as_ref() else {
        return;
    };
    match metrics.register(registry) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
        Err(err) => error!(?err, "failed to register channel metrics"),
    }
}

/// Records one evaluated snippet. Latency is only observed for successful round trips.
pub fn observe_command(kind: &str, elapsed: Duration, ok: bool) {
    if let Some(metrics) = CHANNEL_METRICS.as_ref() {
        metrics.observe(kind, elapsed, ok);
    }
}

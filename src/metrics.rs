use anyhow::{Context, Result};
use cdp_adapter::metrics as cdp_metrics;
use once_cell::sync::{Lazy, OnceCell};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::error;

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static REGISTER_ONCE: OnceCell<()> = OnceCell::new();

static RUNS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relay_runs_total", "Orchestration runs by outcome"),
        &["outcome"],
    )
    .map_err(|err| error!(?err, "failed to create run counter"))
    .ok()
});

static RECORDS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("relay_records_total", "Move records acquired by origin"),
        &["origin"],
    )
    .map_err(|err| error!(?err, "failed to create record counter"))
    .ok()
});

pub fn register_metrics() {
    REGISTER_ONCE.get_or_init(|| {
        let registry = global_registry();
        cdp_metrics::register_metrics(registry);
        for counter in [RUNS_TOTAL.as_ref(), RECORDS_TOTAL.as_ref()].into_iter().flatten() {
            if let Err(err) = registry.register(Box::new(counter.clone())) {
                error!(?err, "failed to register relay metric");
            }
        }
    });
}

pub fn record_run(outcome: &str) {
    if let Some(counter) = RUNS_TOTAL.as_ref() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_origin(origin: &str) {
    if let Some(counter) = RECORDS_TOTAL.as_ref() {
        counter.with_label_values(&[origin]).inc();
    }
}

/// Text exposition of every registered collector.
pub fn gather_text() -> Result<String> {
    register_metrics();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&global_registry().gather(), &mut buffer)
        .context("failed to encode prometheus metrics")?;
    String::from_utf8(buffer).context("prometheus output is not utf8")
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_contains_run_counter() {
        record_run("completed");
        let text = gather_text().unwrap();
        assert!(text.contains("relay_runs_total"));
    }
}

//! Prometheus metrics for the signal engine and its HTTP surface.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::error::SignalErrorKind;
use crate::models::market::AssetClass;
use crate::models::signal::SignalDirection;

pub struct Metrics {
    registry: Registry,
    pub signals_computed_total: IntCounterVec,
    pub signal_errors_total: IntCounterVec,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signals_computed_total = IntCounterVec::new(
            Opts::new("signals_computed_total", "Signals computed, by asset class and direction"),
            &["asset_class", "signal"],
        )?;
        let signal_errors_total = IntCounterVec::new(
            Opts::new("signal_errors_total", "Failed signal computations, by error kind"),
            &["kind"],
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;

        registry.register(Box::new(signals_computed_total.clone()))?;
        registry.register(Box::new(signal_errors_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signals_computed_total,
            signal_errors_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    pub fn record_signal(&self, asset_class: AssetClass, signal: SignalDirection) {
        let signal = signal.to_string();
        self.signals_computed_total
            .with_label_values(&[asset_class.as_str(), signal.as_str()])
            .inc();
    }

    pub fn record_error(&self, kind: &SignalErrorKind) {
        self.signal_errors_total
            .with_label_values(&[kind.label()])
            .inc();
    }

    /// Text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

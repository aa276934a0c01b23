use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub bookings_created_total: IntCounter,
    pub booking_transitions_total: IntCounterVec,
    pub provider_searches_total: IntCounterVec,
    pub search_latency_seconds: HistogramVec,
    pub verified_providers: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let bookings_created_total = IntCounter::new(
            "bookings_created_total",
            "Total bookings created",
        )
        .expect("valid bookings_created_total metric");

        let booking_transitions_total = IntCounterVec::new(
            Opts::new(
                "booking_transitions_total",
                "Total booking status transitions by target status",
            ),
            &["status"],
        )
        .expect("valid booking_transitions_total metric");

        let provider_searches_total = IntCounterVec::new(
            Opts::new("provider_searches_total", "Total provider searches by outcome"),
            &["outcome"],
        )
        .expect("valid provider_searches_total metric");

        let search_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "search_latency_seconds",
                "Latency of provider searches in seconds",
            ),
            &["outcome"],
        )
        .expect("valid search_latency_seconds metric");

        let verified_providers = IntGauge::new(
            "verified_providers",
            "Current number of verified providers",
        )
        .expect("valid verified_providers metric");

        registry
            .register(Box::new(bookings_created_total.clone()))
            .expect("register bookings_created_total");
        registry
            .register(Box::new(booking_transitions_total.clone()))
            .expect("register booking_transitions_total");
        registry
            .register(Box::new(provider_searches_total.clone()))
            .expect("register provider_searches_total");
        registry
            .register(Box::new(search_latency_seconds.clone()))
            .expect("register search_latency_seconds");
        registry
            .register(Box::new(verified_providers.clone()))
            .expect("register verified_providers");

        Self {
            registry,
            bookings_created_total,
            booking_transitions_total,
            provider_searches_total,
            search_latency_seconds,
            verified_providers,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

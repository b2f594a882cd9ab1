pub mod middleware;

pub use middleware::MetricsMiddleware;

use std::sync::{Arc, OnceLock};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::config::AppConfig;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Prometheus recorder handle plus the typed HTTP recording helpers the
/// middleware uses. Account counters (`signups_total`, `logins_total`, ...)
/// are incremented by the services through the `metrics` macros; they are
/// described here so the exposition carries help texts.
#[derive(Clone)]
pub struct AppMetrics {
    prometheus_handle: Arc<PrometheusHandle>,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self::with_config(None)
    }

    /// The recorder is process-global; the first caller installs it and
    /// later calls reuse the same handle, so config labels only apply on
    /// first installation.
    pub fn with_config(config: Option<&AppConfig>) -> Self {
        let handle = PROMETHEUS_HANDLE.get_or_init(|| {
            let builder = PrometheusBuilder::new();

            let builder = if let Some(cfg) = config {
                builder
                    .add_global_label("service", cfg.app.name.clone())
                    .add_global_label("version", cfg.app.version.clone())
                    .add_global_label("environment", cfg.app.environment.clone())
            } else {
                builder
            };

            let builder = builder
                .set_buckets_for_metric(
                    Matcher::Full("http_requests_duration_seconds".to_string()),
                    &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0],
                )
                .expect("Failed to set buckets for http_requests_duration_seconds");

            Self::describe_metrics();

            builder
                .install_recorder()
                .expect("Failed to install Prometheus recorder")
        });

        Self {
            prometheus_handle: Arc::new(handle.clone()),
        }
    }

    fn describe_metrics() {
        // HTTP metrics
        describe_counter!("http_requests_total", "Total number of HTTP requests");
        describe_histogram!(
            "http_requests_duration_seconds",
            "HTTP request duration in seconds"
        );
        describe_gauge!(
            "http_requests_in_flight",
            "Number of HTTP requests currently being processed"
        );

        // Account metrics
        describe_counter!("signups_total", "Accounts created through the signup form");
        describe_counter!("logins_total", "Successful logins");
        describe_counter!("login_failures_total", "Rejected login attempts");
        describe_counter!("logouts_total", "Sessions ended through logout");
        describe_counter!("password_changes_total", "Successful password changes");
        describe_counter!(
            "csrf_rejections_total",
            "Requests rejected by CSRF verification"
        );
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            "http_requests_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .record(duration_secs);
    }

    pub fn http_request_start(&self) {
        gauge!("http_requests_in_flight").increment(1.0);
    }

    pub fn http_request_end(&self) {
        gauge!("http_requests_in_flight").decrement(1.0);
    }

    pub fn render(&self) -> String {
        self.prometheus_handle.render()
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

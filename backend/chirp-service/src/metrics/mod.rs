//! Prometheus metrics for chirp-service.
//!
//! Operation outcome counters, feed size distribution and the `/metrics`
//! handler. Pool gauges are registered by `db-pool` in the same default
//! registry.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

use crate::error::AppError;

lazy_static! {
    /// Completed service operations by outcome (`success` or error kind).
    pub static ref OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "chirp_operations_total",
        "Service operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register chirp_operations_total");

    /// Number of tweets returned per feed request.
    pub static ref FEED_SIZE: Histogram = register_histogram!(
        "chirp_feed_size",
        "Number of tweets returned per feed request",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]
    )
    .expect("failed to register chirp_feed_size");
}

/// Count the outcome of `operation` and hand the result back unchanged.
pub fn record_outcome<T>(
    operation: &str,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(err) => err.kind(),
    };
    OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    result
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;

    #[test]
    fn record_outcome_counts_success_and_error_kind() {
        let ok_before = OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "success"])
            .get();
        let conflict_before = OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "conflict"])
            .get();

        let ok: Result<i64, AppError> = record_outcome("metrics_test", Ok(1));
        assert_eq!(ok.unwrap(), 1);

        let err: Result<(), AppError> = record_outcome(
            "metrics_test",
            Err(AppError::conflict(codes::BAD_LIKE, "Such like already exists")),
        );
        assert!(err.is_err());

        assert_eq!(
            OPERATIONS_TOTAL
                .with_label_values(&["metrics_test", "success"])
                .get(),
            ok_before + 1
        );
        assert_eq!(
            OPERATIONS_TOTAL
                .with_label_values(&["metrics_test", "conflict"])
                .get(),
            conflict_before + 1
        );
    }

    #[actix_web::test]
    async fn serve_metrics_renders_text_format() {
        OPERATIONS_TOTAL
            .with_label_values(&["metrics_render", "success"])
            .inc();

        let response = serve_metrics().await;
        assert!(response.status().is_success());

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("chirp_operations_total"));
    }
}

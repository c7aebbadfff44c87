// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    GEMINI_API_CALLS,
    GEMINI_API_DURATION,
    TRANSLATIONS_TOTAL,
    TRANSLATION_DURATION,
};

/// Helper to record a finished translation request
pub fn record_translation(mode: &str, outcome: &str, duration_secs: f64) {
    TRANSLATIONS_TOTAL.with_label_values(&[mode, outcome]).inc();
    TRANSLATION_DURATION
        .with_label_values(&[mode])
        .observe(duration_secs);
}

/// Helper to record Gemini API call metrics
pub fn record_gemini_call(model: &str, status_code: u16, duration_secs: f64) {
    GEMINI_API_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    GEMINI_API_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record a request rejected before reaching Gemini
pub fn record_rejected(mode: &str) {
    TRANSLATIONS_TOTAL.with_label_values(&[mode, "invalid_input"]).inc();
}
